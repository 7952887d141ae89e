use std::any::{Any, TypeId};
use std::sync::Arc;

use derive_more::Debug;
use rustc_hash::FxHashMap;

use crate::hooks::HookPoint;

/// The priority hooks run at unless one is given.
pub const DEFAULT_PRIORITY: i32 = 10;

type Filter<P> = Box<dyn Fn(<P as HookPoint>::Value, &<P as HookPoint>::Input) -> <P as HookPoint>::Value + Send + Sync>;

type Action<P> = Box<dyn Fn(&<P as HookPoint>::Input) + Send + Sync>;

/// Callbacks of one kind, kept sorted by priority. Ties keep registration
/// order.
struct Chain<F> {
    entries: Vec<(i32, F)>,
}

impl<F> Chain<F> {
    fn insert(&mut self, priority: i32, f: F) {
        let i = self.entries.partition_point(|(p, _)| *p <= priority);
        self.entries.insert(i, (priority, f));
    }

    fn iter(&self) -> impl Iterator<Item = &F> {
        self.entries.iter().map(|(_, f)| f)
    }
}

type AnyChain = Box<dyn Any + Send + Sync>;

#[derive(Default)]
struct Slots {
    untagged: Option<AnyChain>,
    tagged: FxHashMap<Arc<str>, AnyChain>,
}

impl Slots {
    fn get(&self, tag: Option<&str>) -> Option<&AnyChain> {
        match tag {
            Some(tag) => self.tagged.get(tag),
            None => self.untagged.as_ref(),
        }
    }

    fn get_or_insert_with<F>(&mut self, tag: Option<&str>, f: F) -> &mut AnyChain
        where F: FnOnce() -> AnyChain
    {
        match tag {
            Some(tag) => self.tagged.entry(tag.into()).or_insert_with(f),
            None => self.untagged.get_or_insert_with(f),
        }
    }
}

/// The registry of every filter and action for one theme.
#[derive(Debug, Default)]
pub struct Hooks {
    #[debug(ignore)]
    filters: FxHashMap<TypeId, Slots>,
    #[debug(ignore)]
    actions: FxHashMap<TypeId, Slots>,
}

impl Hooks {
    pub fn new() -> Self {
        Hooks::default()
    }

    fn chain<'a, P: HookPoint, F: 'static>(
        map: &'a FxHashMap<TypeId, Slots>,
        tag: Option<&str>,
    ) -> Option<&'a Chain<F>> {
        map.get(&TypeId::of::<P>())?
            .get(tag)?
            .downcast_ref::<Chain<F>>()
    }

    fn chain_mut<'a, P: HookPoint, F: Send + Sync + 'static>(
        map: &'a mut FxHashMap<TypeId, Slots>,
        tag: Option<&str>,
    ) -> &'a mut Chain<F> {
        map.entry(TypeId::of::<P>())
            .or_default()
            .get_or_insert_with(tag, || Box::new(Chain::<F> { entries: vec![] }) as AnyChain)
            .downcast_mut::<Chain<F>>()
            .expect("slots are keyed by the point's type id")
    }

    /// Registers an untagged filter for `P`.
    pub fn add_filter<P, F>(&mut self, _: P, priority: i32, filter: F) -> &mut Self
        where P: HookPoint, F: Fn(P::Value, &P::Input) -> P::Value + Send + Sync + 'static
    {
        tracing::trace!(point = P::NAME, priority, "adding filter");
        Self::chain_mut::<P, Filter<P>>(&mut self.filters, None)
            .insert(priority, Box::new(filter));
        self
    }

    /// Registers a filter for `P` that only runs for `tag`.
    pub fn add_tagged_filter<P, F>(&mut self, _: P, tag: &str, priority: i32, filter: F) -> &mut Self
        where P: HookPoint, F: Fn(P::Value, &P::Input) -> P::Value + Send + Sync + 'static
    {
        tracing::trace!(point = P::NAME, tag, priority, "adding tagged filter");
        Self::chain_mut::<P, Filter<P>>(&mut self.filters, Some(tag))
            .insert(priority, Box::new(filter));
        self
    }

    pub fn add_action<P, F>(&mut self, _: P, priority: i32, action: F) -> &mut Self
        where P: HookPoint, F: Fn(&P::Input) + Send + Sync + 'static
    {
        tracing::trace!(point = P::NAME, priority, "adding action");
        Self::chain_mut::<P, Action<P>>(&mut self.actions, None)
            .insert(priority, Box::new(action));
        self
    }

    pub fn has_filter<P: HookPoint>(&self, _: P, tag: Option<&str>) -> bool {
        Self::chain::<P, Filter<P>>(&self.filters, tag).is_some_and(|c| !c.entries.is_empty())
    }

    /// Runs `value` through the untagged chain of `P`.
    pub fn apply<P: HookPoint>(&self, _: P, value: P::Value, input: &P::Input) -> P::Value {
        Self::run::<P>(&self.filters, None, value, input)
    }

    /// Folds `value` through the chain of each of `tags`, in order. Tags
    /// without a chain leave the value untouched.
    pub fn apply_tagged<P, T>(&self, _: P, tags: &[T], value: P::Value, input: &P::Input) -> P::Value
        where P: HookPoint, T: AsRef<str>
    {
        tags.iter().fold(value, |value, tag| {
            Self::run::<P>(&self.filters, Some(tag.as_ref()), value, input)
        })
    }

    fn run<P: HookPoint>(
        map: &FxHashMap<TypeId, Slots>,
        tag: Option<&str>,
        value: P::Value,
        input: &P::Input,
    ) -> P::Value {
        match Self::chain::<P, Filter<P>>(map, tag) {
            Some(chain) => chain.iter().fold(value, |value, filter| filter(value, input)),
            None => value,
        }
    }

    /// Fires every action registered for `P`.
    pub fn do_action<P: HookPoint>(&self, _: P, input: &P::Input) {
        if let Some(chain) = Self::chain::<P, Action<P>>(&self.actions, None) {
            chain.iter().for_each(|action| action(input));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    crate::define_hook_point! {
        Shout : "shout" => String, str;
        Count : "count" => u64, ();
        Ping : "ping" => (), str;
    }

    #[test]
    fn filters_run_in_priority_then_registration_order() {
        let mut hooks = Hooks::new();
        hooks.add_filter(Shout, 20, |s, _| s + "c")
            .add_filter(Shout, DEFAULT_PRIORITY, |s, _| s + "a")
            .add_filter(Shout, DEFAULT_PRIORITY, |s, _| s + "b")
            .add_filter(Shout, 1, |s, input| format!("{input}:{s}"));

        assert_eq!(hooks.apply(Shout, String::new(), "x"), "x:abc");
        assert!(hooks.has_filter(Shout, None));
        assert!(!hooks.has_filter(Count, None));
    }

    #[test]
    fn tagged_filters_fold_in_tag_order() {
        let mut hooks = Hooks::new();
        hooks.add_tagged_filter(Count, "double", DEFAULT_PRIORITY, |n, _| n * 2)
            .add_tagged_filter(Count, "inc", DEFAULT_PRIORITY, |n, _| n + 1);

        assert_eq!(hooks.apply_tagged(Count, &["inc", "double"], 1, &()), 4);
        assert_eq!(hooks.apply_tagged(Count, &["double", "inc"], 1, &()), 3);
        assert_eq!(hooks.apply_tagged(Count, &["missing", "inc"], 1, &()), 2);

        // Tagged chains never leak into the untagged chain.
        assert_eq!(hooks.apply(Count, 1, &()), 1);
        assert!(hooks.has_filter(Count, Some("inc")));
        assert!(!hooks.has_filter(Count, Some("missing")));
    }

    #[test]
    fn actions_observe_input() {
        let seen = Arc::new(Mutex::new(vec![]));
        let mut hooks = Hooks::new();

        let log = seen.clone();
        hooks.add_action(Ping, 5, move |name: &str| log.lock().unwrap().push(format!("late {name}")));
        let log = seen.clone();
        hooks.add_action(Ping, 1, move |name: &str| log.lock().unwrap().push(format!("early {name}")));

        hooks.do_action(Ping, "part");
        assert_eq!(*seen.lock().unwrap(), ["early part", "late part"]);
    }
}
