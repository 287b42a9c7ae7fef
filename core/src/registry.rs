//! Per-type animation tables and the per-instance cache of resolved animations.

use crate::animation::Animation;
use crate::definition::AnimationTable;
use crate::error::{AnimationError, Result};
use crate::target::StyleContext;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// Animation tables of every component type, keyed by component name.
///
/// Each type keeps the table it was [registered](Self::register) with alongside the current one,
/// so that an editor can [replace](Self::set) a table and later [reset](Self::reset) it.
///
/// Replacing a table does not affect [`AnimationSet`]s that already resolved an animation; call
/// [`AnimationSet::clear`] to pick up the new definitions.
#[derive(Default)]
pub struct AnimationRegistry {
    tables: RefCell<HashMap<String, RegisteredTable>>,
}

struct RegisteredTable {
    original: Rc<AnimationTable>,
    current: Rc<AnimationTable>,
}

impl AnimationRegistry {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Declares the table of a component type. Registering a type again replaces both its original
    /// and its current table.
    pub fn register(&self, component: impl Into<String>, table: AnimationTable) {
        let component = component.into();
        debug!(component = %component, animations = table.len(), "animation table registered");
        let table = Rc::new(table);
        self.tables.borrow_mut().insert(
            component,
            RegisteredTable {
                original: table.clone(),
                current: table,
            },
        );
    }

    /// Replaces the current table of a component type, keeping its original for
    /// [`reset`](Self::reset). A type that was never registered is registered with this table.
    pub fn set(&self, component: impl Into<String>, table: AnimationTable) {
        let component = component.into();
        let mut tables = self.tables.borrow_mut();
        if let Some(registered) = tables.get_mut(&component) {
            debug!(component = %component, animations = table.len(), "animation table replaced");
            registered.current = Rc::new(table);
            return;
        }
        drop(tables);
        self.register(component, table);
    }

    /// Restores the table a component type was registered with. Returns `false` if the type is
    /// unknown.
    pub fn reset(&self, component: &str) -> bool {
        let mut tables = self.tables.borrow_mut();
        match tables.get_mut(component) {
            Some(registered) => {
                debug!(component, "animation table reset");
                registered.current = registered.original.clone();
                true
            }
            None => false,
        }
    }

    /// Current table of a component type.
    pub fn table(&self, component: &str) -> Option<Rc<AnimationTable>> {
        self.tables
            .borrow()
            .get(component)
            .map(|registered| registered.current.clone())
    }

    /// Names of all registered component types, sorted.
    pub fn component_types(&self) -> Vec<String> {
        let mut names = self.tables.borrow().keys().cloned().collect::<Vec<_>>();
        names.sort();
        names
    }

    /// Replaces the current table of a component type with one read from JSON.
    ///
    /// On error, the current table is left untouched.
    #[cfg(feature = "serde")]
    pub fn load_json(&self, component: impl Into<String>, json: &str) -> Result<()> {
        let table: AnimationTable = serde_json::from_str(json)?;
        self.set(component, table);
        Ok(())
    }

    /// Writes the current table of a component type as JSON; an unknown type has an empty table.
    #[cfg(feature = "serde")]
    pub fn export_json(&self, component: &str) -> Result<String> {
        let table = self.table(component).unwrap_or_default();
        Ok(serde_json::to_string_pretty(table.as_ref())?)
    }
}

impl fmt::Debug for AnimationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationRegistry")
            .field("component_types", &self.component_types())
            .finish()
    }
}

/// Animations of a single component instance, resolved lazily from the registry and cached by
/// name for the lifetime of the instance.
pub struct AnimationSet {
    registry: Rc<AnimationRegistry>,
    cache: RefCell<HashMap<String, Rc<Animation>>>,
}

impl AnimationSet {
    pub fn new(registry: Rc<AnimationRegistry>) -> Self {
        Self {
            registry,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &Rc<AnimationRegistry> {
        &self.registry
    }

    /// Gets the animation `name` of the component `ctx`, resolving it on first access.
    ///
    /// Every later call with the same name returns the same animation. Names missing from the
    /// component's table fail immediately, without touching any style.
    pub fn get<C: StyleContext + ?Sized>(&self, ctx: &C, name: &str) -> Result<Rc<Animation>> {
        if let Some(animation) = self.cache.borrow().get(name) {
            return Ok(animation.clone());
        }
        let component = ctx.component_name();
        let group = self
            .registry
            .table(component)
            .and_then(|table| table.get(name).cloned())
            .ok_or_else(|| AnimationError::UnknownAnimation {
                component: component.to_string(),
                name: name.to_string(),
            })?;
        let animation = Rc::new(Animation::new(ctx, &group)?);
        debug!(component, name, "animation resolved");
        self.cache
            .borrow_mut()
            .insert(name.to_string(), animation.clone());
        Ok(animation)
    }

    /// Whether `name` has been resolved already.
    pub fn is_cached(&self, name: &str) -> bool {
        self.cache.borrow().contains_key(name)
    }

    /// Forgets every resolved animation, so that the next access re-reads the registry.
    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }
}

impl fmt::Debug for AnimationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = self.cache.borrow().keys().cloned().collect::<Vec<_>>();
        names.sort();
        f.debug_struct("AnimationSet").field("cached", &names).finish()
    }
}

/// A component that owns an [`AnimationSet`] and can therefore look up its animations by name.
pub trait Animated: StyleContext {
    fn animation_set(&self) -> &AnimationSet;

    /// Gets the named animation of this component, resolving it on first access.
    fn animations(&self, name: &str) -> Result<Rc<Animation>> {
        self.animation_set().get(self, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{AnimationGroup, PrimitiveAnimation};
    use crate::target::{InlineStyle, SharedStyle, StyleTarget, Styleable};

    struct Badge {
        root: Rc<InlineStyle>,
        animations: AnimationSet,
    }

    impl StyleContext for Badge {
        fn component_name(&self) -> &str {
            "Badge"
        }

        fn root_style(&self) -> SharedStyle {
            self.root.style()
        }

        fn target_style(&self, _name: &str) -> Option<SharedStyle> {
            None
        }
    }

    impl Animated for Badge {
        fn animation_set(&self) -> &AnimationSet {
            &self.animations
        }
    }

    fn pulse(to: &str) -> AnimationTable {
        AnimationTable::from([(
            "pulse".to_string(),
            AnimationGroup::new([PrimitiveAnimation::new("opacity", to)]),
        )])
    }

    fn badge(registry: &Rc<AnimationRegistry>) -> Badge {
        Badge {
            root: InlineStyle::with([("opacity", "1")]),
            animations: AnimationSet::new(registry.clone()),
        }
    }

    #[test]
    fn same_animation_is_returned_for_same_name() {
        let registry = AnimationRegistry::new();
        registry.register("Badge", pulse("0.5"));
        let badge = badge(&registry);

        let first = badge.animations("pulse").unwrap();
        let second = badge.animations("pulse").unwrap();

        assert!(Rc::ptr_eq(&first, &second));
        assert!(badge.animation_set().is_cached("pulse"));
    }

    #[test]
    fn instances_do_not_share_animations() {
        let registry = AnimationRegistry::new();
        registry.register("Badge", pulse("0.5"));
        let (a, b) = (badge(&registry), badge(&registry));

        let first = a.animations("pulse").unwrap();
        let second = b.animations("pulse").unwrap();

        assert!(!Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn unknown_name_fails_without_side_effects() {
        let registry = AnimationRegistry::new();
        registry.register("Badge", pulse("0.5"));
        let badge = badge(&registry);

        let err = badge.animations("doesNotExist").unwrap_err();

        assert!(matches!(
            err,
            AnimationError::UnknownAnimation { ref component, ref name }
                if component == "Badge" && name == "doesNotExist"
        ));
        assert!(!badge.animation_set().is_cached("doesNotExist"));
        assert_eq!(badge.root.get_style("opacity").as_deref(), Some("1"));
    }

    #[test]
    fn unregistered_component_has_no_animations() {
        let badge = badge(&AnimationRegistry::new());

        assert!(matches!(
            badge.animations("pulse"),
            Err(AnimationError::UnknownAnimation { .. })
        ));
    }

    #[test]
    fn set_and_reset_swap_tables() {
        let registry = AnimationRegistry::new();
        registry.register("Badge", pulse("0.5"));

        registry.set("Badge", pulse("0.1"));
        let current = registry.table("Badge").unwrap();
        assert_eq!(
            current["pulse"].animations[0].to.as_ref().map(|v| v.to_css()).as_deref(),
            Some("0.1")
        );

        assert!(registry.reset("Badge"));
        let restored = registry.table("Badge").unwrap();
        assert_eq!(
            restored["pulse"].animations[0].to.as_ref().map(|v| v.to_css()).as_deref(),
            Some("0.5")
        );
        assert!(!registry.reset("Card"));
    }

    #[test]
    fn cached_animations_survive_table_changes_until_cleared() {
        let registry = AnimationRegistry::new();
        registry.register("Badge", pulse("0.5"));
        let badge = badge(&registry);
        let before = badge.animations("pulse").unwrap();

        registry.set("Badge", AnimationTable::new());
        assert!(Rc::ptr_eq(&before, &badge.animations("pulse").unwrap()));

        badge.animation_set().clear();
        assert!(badge.animations("pulse").is_err());
    }

    #[test]
    fn component_types_are_sorted() {
        let registry = AnimationRegistry::new();
        registry.register("Toolbar", AnimationTable::new());
        registry.set("Badge", AnimationTable::new());

        assert_eq!(registry.component_types(), vec!["Badge", "Toolbar"]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_round_trip_through_registry() {
        let registry = AnimationRegistry::new();
        registry.register("Badge", pulse("0.5"));

        let json = registry.export_json("Badge").unwrap();
        registry.set("Badge", AnimationTable::new());
        registry.load_json("Badge", &json).unwrap();

        let table = registry.table("Badge").unwrap();
        assert_eq!(table["pulse"].animations[0].track, "opacity");
        assert!(registry.load_json("Badge", "{ not json").is_err());
        assert!(registry.table("Badge").unwrap().contains_key("pulse"));
    }
}
