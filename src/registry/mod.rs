//! Render-override registry.
//!
//! Maps document node kinds to custom render units. The markdown renderer
//! asks the registry for every overridable node and falls back to its own
//! default rendering when nothing is registered.
//!
//! A mapping is assembled with [`OverridesBuilder`] (or [`Overrides::build`]
//! from an ordered list of entries) and frozen into an immutable
//! [`Overrides`] value. Registration is last-write-wins: a later entry for a
//! kind silently replaces the earlier one.
//!
//! ```ignore
//! let overrides = Overrides::build([
//!     ("h2", RenderUnit::heading(MyHeading)),
//!     ("a", RenderUnit::link(MyLink)),
//! ])?;
//! assert!(overrides.lookup(NodeKind::Heading(3)).is_none());
//! ```

mod kind;
mod unit;

use std::collections::HashMap;

pub use kind::{Capability, NodeKind};
pub use unit::{
    CodeBlockComponent, CodeBlockProps, HeadingComponent, HeadingProps, ImageComponent,
    ImageProps, InlineCodeComponent, InlineCodeProps, LinkComponent, LinkProps, RenderError,
    RenderUnit, StrongComponent, StrongProps,
};

/// An invalid override declaration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("unrecognized node kind '{0}'")]
    UnknownNodeKind(String),

    #[error("node kind '{kind}' needs a {expected} component, got a {actual} component")]
    CapabilityMismatch {
        kind: NodeKind,
        expected: Capability,
        actual: Capability,
    },
}

/// Mutable accumulator for override entries.
#[derive(Debug, Default, Clone)]
pub struct OverridesBuilder {
    units: HashMap<NodeKind, RenderUnit>,
}

impl OverridesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a render unit under a node kind identifier (`h2`, `a`, ...).
    ///
    /// Replaces any unit already registered for the same kind. On error the
    /// builder is left untouched.
    pub fn register(
        &mut self,
        kind: &str,
        unit: RenderUnit,
    ) -> Result<&mut Self, ConfigurationError> {
        let kind: NodeKind = kind.parse()?;
        self.register_kind(kind, unit)
    }

    /// Register a render unit under an already parsed node kind.
    pub fn register_kind(
        &mut self,
        kind: NodeKind,
        unit: RenderUnit,
    ) -> Result<&mut Self, ConfigurationError> {
        if !kind.is_recognized() {
            return Err(ConfigurationError::UnknownNodeKind(kind.to_string()));
        }

        let expected = kind.capability();
        let actual = unit.capability();
        if expected != actual {
            return Err(ConfigurationError::CapabilityMismatch {
                kind,
                expected,
                actual,
            });
        }

        if self.units.insert(kind, unit).is_some() {
            tracing::debug!(%kind, "replacing earlier override");
        }
        Ok(self)
    }

    /// Freeze the accumulated entries.
    pub fn finish(self) -> Overrides {
        Overrides { units: self.units }
    }
}

/// An immutable node kind → render unit mapping.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    units: HashMap<NodeKind, RenderUnit>,
}

impl Overrides {
    /// A mapping with no overrides; every lookup falls back to the default.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a mapping from ordered `(identifier, unit)` entries.
    ///
    /// Entries are registered in sequence, so the last entry for a repeated
    /// kind wins. Stops at the first invalid entry.
    pub fn build<'a, I>(entries: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (&'a str, RenderUnit)>,
    {
        let mut builder = OverridesBuilder::new();
        for (kind, unit) in entries {
            builder.register(kind, unit)?;
        }
        Ok(builder.finish())
    }

    /// The unit registered for `kind`, or `None` to use the default renderer.
    pub fn lookup(&self, kind: NodeKind) -> Option<&RenderUnit> {
        self.units.get(&kind)
    }

    /// Returns true if an override exists for `kind`.
    pub fn contains(&self, kind: NodeKind) -> bool {
        self.units.contains_key(&kind)
    }

    pub fn heading(&self, level: u8) -> Option<&dyn HeadingComponent> {
        match self.units.get(&NodeKind::Heading(level))? {
            RenderUnit::Heading(c) => Some(c.as_ref()),
            _ => None,
        }
    }

    pub fn link(&self) -> Option<&dyn LinkComponent> {
        match self.units.get(&NodeKind::Link)? {
            RenderUnit::Link(c) => Some(c.as_ref()),
            _ => None,
        }
    }

    pub fn image(&self) -> Option<&dyn ImageComponent> {
        match self.units.get(&NodeKind::Image)? {
            RenderUnit::Image(c) => Some(c.as_ref()),
            _ => None,
        }
    }

    pub fn code_block(&self) -> Option<&dyn CodeBlockComponent> {
        match self.units.get(&NodeKind::CodeBlock)? {
            RenderUnit::CodeBlock(c) => Some(c.as_ref()),
            _ => None,
        }
    }

    pub fn inline_code(&self) -> Option<&dyn InlineCodeComponent> {
        match self.units.get(&NodeKind::InlineCode)? {
            RenderUnit::InlineCode(c) => Some(c.as_ref()),
            _ => None,
        }
    }

    pub fn strong(&self) -> Option<&dyn StrongComponent> {
        match self.units.get(&NodeKind::Strong)? {
            RenderUnit::Strong(c) => Some(c.as_ref()),
            _ => None,
        }
    }

    /// Registered kinds in canonical order.
    pub fn kinds(&self) -> Vec<NodeKind> {
        let mut kinds: Vec<NodeKind> = self.units.keys().copied().collect();
        kinds.sort();
        kinds
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    impl HeadingComponent for Fixed {
        fn render(&self, _props: &HeadingProps) -> Result<String, RenderError> {
            Ok(self.0.to_string())
        }
    }

    impl LinkComponent for Fixed {
        fn render(&self, _props: &LinkProps) -> Result<String, RenderError> {
            Ok(self.0.to_string())
        }
    }

    impl ImageComponent for Fixed {
        fn render(&self, _props: &ImageProps) -> Result<String, RenderError> {
            Ok(self.0.to_string())
        }
    }

    impl CodeBlockComponent for Fixed {
        fn render(&self, _props: &CodeBlockProps) -> Result<String, RenderError> {
            Ok(self.0.to_string())
        }
    }

    impl StrongComponent for Fixed {
        fn render(&self, _props: &StrongProps) -> Result<String, RenderError> {
            Ok(self.0.to_string())
        }
    }

    fn heading_props() -> HeadingProps {
        HeadingProps {
            level: 2,
            id: "intro".to_string(),
            text: "Intro".to_string(),
            children: "Intro".to_string(),
        }
    }

    fn render_heading(overrides: &Overrides, level: u8) -> Option<String> {
        overrides
            .heading(level)
            .map(|c| c.render(&heading_props()).unwrap())
    }

    #[test]
    fn test_register_then_lookup() {
        let unit = RenderUnit::heading(Fixed("comp-a"));
        let mut builder = OverridesBuilder::new();
        builder.register("h2", unit.clone()).unwrap();
        let overrides = builder.finish();

        let found = overrides.lookup(NodeKind::Heading(2)).unwrap();
        assert!(found.same_as(&unit));
    }

    #[test]
    fn test_register_every_kind() {
        let units = [
            ("h1", RenderUnit::heading(Fixed("h1"))),
            ("a", RenderUnit::link(Fixed("a"))),
            ("img", RenderUnit::image(Fixed("img"))),
            ("pre", RenderUnit::code_block(Fixed("pre"))),
            ("strong", RenderUnit::strong(Fixed("strong"))),
        ];

        for (kind, unit) in units {
            let mut builder = OverridesBuilder::new();
            builder.register(kind, unit.clone()).unwrap();
            let overrides = builder.finish();
            let parsed: NodeKind = kind.parse().unwrap();
            assert!(overrides.lookup(parsed).unwrap().same_as(&unit));
        }
    }

    #[test]
    fn test_register_same_pair_twice_is_idempotent() {
        let unit = RenderUnit::link(Fixed("link"));

        let mut once = OverridesBuilder::new();
        once.register("a", unit.clone()).unwrap();
        let once = once.finish();

        let mut twice = OverridesBuilder::new();
        twice.register("a", unit.clone()).unwrap();
        twice.register("a", unit.clone()).unwrap();
        let twice = twice.finish();

        assert_eq!(once.kinds(), twice.kinds());
        assert!(
            once.lookup(NodeKind::Link)
                .unwrap()
                .same_as(twice.lookup(NodeKind::Link).unwrap())
        );
    }

    #[test]
    fn test_last_entry_wins() {
        let first = RenderUnit::heading(Fixed("first"));
        let second = RenderUnit::heading(Fixed("second"));

        let overrides =
            Overrides::build([("h2", first.clone()), ("h2", second.clone())]).unwrap();

        assert_eq!(overrides.len(), 1);
        assert!(overrides.lookup(NodeKind::Heading(2)).unwrap().same_as(&second));
        assert_eq!(render_heading(&overrides, 2).as_deref(), Some("second"));
    }

    #[test]
    fn test_aliases_collide_on_the_same_kind() {
        let overrides = Overrides::build([
            ("h2", RenderUnit::heading(Fixed("by-tag"))),
            ("heading-2", RenderUnit::heading(Fixed("by-name"))),
        ])
        .unwrap();

        assert_eq!(render_heading(&overrides, 2).as_deref(), Some("by-name"));
    }

    #[test]
    fn test_unregistered_kind_is_absent() {
        let overrides = Overrides::build([("a", RenderUnit::link(Fixed("link")))]).unwrap();

        assert!(overrides.lookup(NodeKind::Image).is_none());
        assert!(overrides.image().is_none());
        assert!(Overrides::empty().lookup(NodeKind::Link).is_none());
    }

    #[test]
    fn test_unknown_kind_fails_without_altering_mapping() {
        let mut builder = OverridesBuilder::new();
        builder
            .register("a", RenderUnit::link(Fixed("link")))
            .unwrap();

        let err = builder
            .register("not-a-real-kind", RenderUnit::link(Fixed("other")))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnknownNodeKind("not-a-real-kind".to_string())
        );
        assert!(err.to_string().contains("not-a-real-kind"));

        let overrides = builder.finish();
        assert_eq!(overrides.kinds(), vec![NodeKind::Link]);
    }

    #[test]
    fn test_unrecognized_typed_heading_level() {
        let mut builder = OverridesBuilder::new();
        let err = builder
            .register_kind(NodeKind::Heading(9), RenderUnit::heading(Fixed("h9")))
            .unwrap_err();
        assert_eq!(err, ConfigurationError::UnknownNodeKind("h9".to_string()));
        assert!(builder.finish().is_empty());
    }

    #[test]
    fn test_capability_mismatch() {
        let mut builder = OverridesBuilder::new();
        let err = builder
            .register("img", RenderUnit::link(Fixed("link")))
            .unwrap_err();

        assert_eq!(
            err,
            ConfigurationError::CapabilityMismatch {
                kind: NodeKind::Image,
                expected: Capability::Image,
                actual: Capability::Link,
            }
        );
        assert!(builder.finish().is_empty());
    }

    #[test]
    fn test_build_stops_at_first_error() {
        let result = Overrides::build([
            ("a", RenderUnit::link(Fixed("link"))),
            ("blink", RenderUnit::link(Fixed("blink"))),
        ]);
        assert!(matches!(
            result,
            Err(ConfigurationError::UnknownNodeKind(ref s)) if s == "blink"
        ));
    }

    #[test]
    fn test_scenario_full_table() {
        let comp_a = RenderUnit::heading(Fixed("CompA"));
        let overrides = Overrides::build([
            ("h2", comp_a.clone()),
            ("a", RenderUnit::link(Fixed("LinkComp"))),
            ("img", RenderUnit::image(Fixed("ImgComp"))),
            ("pre", RenderUnit::code_block(Fixed("PreComp"))),
            ("strong", RenderUnit::strong(Fixed("StrongComp"))),
        ])
        .unwrap();

        assert!(overrides.lookup(NodeKind::Heading(2)).unwrap().same_as(&comp_a));
        assert!(overrides.lookup(NodeKind::Heading(3)).is_none());
        assert_eq!(
            overrides.kinds(),
            vec![
                NodeKind::Heading(2),
                NodeKind::Link,
                NodeKind::Image,
                NodeKind::CodeBlock,
                NodeKind::Strong,
            ]
        );
    }

    #[test]
    fn test_independent_builds_do_not_share_state() {
        let first = Overrides::build([("h2", RenderUnit::heading(Fixed("H2Comp")))]).unwrap();
        let second =
            Overrides::build([("h2", RenderUnit::heading(Fixed("Heading2Comp")))]).unwrap();

        assert_eq!(render_heading(&first, 2).as_deref(), Some("H2Comp"));
        assert_eq!(render_heading(&second, 2).as_deref(), Some("Heading2Comp"));
    }

    #[test]
    fn test_overrides_can_be_shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Overrides>();

        let overrides = std::sync::Arc::new(
            Overrides::build([("h2", RenderUnit::heading(Fixed("shared")))]).unwrap(),
        );
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let overrides = overrides.clone();
                std::thread::spawn(move || render_heading(&overrides, 2))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().as_deref(), Some("shared"));
        }
    }
}
