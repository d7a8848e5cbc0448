//! Builtin names
//!
//! The registry maps every name the DSL understands to a small descriptor.
//! The compiler interprets descriptors generically, so adding a name never
//! requires a new unit type.

use crate::cue::Cue;
use crate::easing::Easing;
use crate::gen::{ScalarOp, Selection};
use crate::particle::Scalar;
use indexmap::IndexMap;

/// Behaviors that are complete without arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Nop,
    Close,
    Explode,
    Voice(Cue),
}

/// Behaviors built from a fixed list of arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constructor {
    Scalar(ScalarOp, Scalar),
    Translate,
    Rotate,
    Emit,
    Loop,
    Repeat,
    Flair,
    Fireworks,
    Character,
    Text,
}

impl Constructor {
    /// Number of arguments the constructor takes
    pub fn arity(self) -> usize {
        match self {
            Constructor::Scalar(..) | Constructor::Loop => 1,
            Constructor::Repeat
            | Constructor::Flair
            | Constructor::Fireworks
            | Constructor::Character => 2,
            Constructor::Translate | Constructor::Rotate => 3,
            Constructor::Emit => 4,
            Constructor::Text => 5,
        }
    }
}

/// What a registered name stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// An easing curve literal
    Easing(Easing),
    /// A nullary behavior
    Action(Action),
    /// An angle operator (takes no arguments)
    Angle(Selection),
    /// A behavior constructor awaiting its arguments
    Constructor(Constructor),
    /// `{}` block: each argument is a lane of statements
    Block,
    /// Choice operator over its arguments
    Choice(Selection),
    /// Range operator over `min max`
    Range(Selection),
}

/// Name to builtin lookup table
#[derive(Debug, Clone)]
pub struct Registry {
    entries: IndexMap<String, Builtin>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Create a registry holding every builtin name
    pub fn builtin() -> Self {
        let mut registry = Self::new();

        for easing in Easing::all() {
            registry.register(easing.name(), Builtin::Easing(easing));
        }

        registry.register("nop", Builtin::Action(Action::Nop));
        registry.register("close", Builtin::Action(Action::Close));
        registry.register("explode", Builtin::Action(Action::Explode));
        registry.register("fireworksExplode", Builtin::Action(Action::Explode));
        registry.register("textExplode", Builtin::Action(Action::Explode));
        for cue in [Cue::Bloom, Cue::Crackle] {
            registry.register(cue.name(), Builtin::Action(Action::Voice(cue)));
        }

        for target in [Scalar::Speed, Scalar::Opacity, Scalar::Hue] {
            let name = target.name();
            registry.register(name, Builtin::Constructor(Constructor::Scalar(ScalarOp::Set, target)));
            registry.register(
                format!("{}+", name),
                Builtin::Constructor(Constructor::Scalar(ScalarOp::Add, target)),
            );
            registry.register(
                format!("{}*", name),
                Builtin::Constructor(Constructor::Scalar(ScalarOp::Multiply, target)),
            );
        }

        let constructors = [
            ("translate", Constructor::Translate),
            ("rotate", Constructor::Rotate),
            ("emit", Constructor::Emit),
            ("loop", Constructor::Loop),
            ("repeat", Constructor::Repeat),
            ("flair", Constructor::Flair),
            ("fireworks", Constructor::Fireworks),
            ("character", Constructor::Character),
            ("text", Constructor::Text),
        ];
        for (name, constructor) in constructors {
            registry.register(name, Builtin::Constructor(constructor));
        }

        registry.register(crate::ast::BLOCK, Builtin::Block);

        for (prefix, selection) in [("each", Selection::Each), ("random", Selection::Random)] {
            registry.register(format!("{}-choice", prefix), Builtin::Choice(selection));
            registry.register(format!("{}-range", prefix), Builtin::Range(selection));
            registry.register(format!("{}-angle", prefix), Builtin::Angle(selection));
        }

        registry
    }

    /// Register a name, returning the builtin it replaces
    pub fn register(&mut self, name: impl Into<String>, builtin: Builtin) -> Option<Builtin> {
        self.entries.insert(name.into(), builtin)
    }

    /// Look up a name
    pub fn get(&self, name: &str) -> Option<Builtin> {
        self.entries.get(name).copied()
    }

    /// Check if a name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterate over registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names() {
        let registry = Registry::builtin();
        for name in [
            "linear",
            "ease-in-out",
            "nop",
            "close",
            "explode",
            "fireworksExplode",
            "textExplode",
            "bloomVoice",
            "crackleVoice",
            "speed",
            "opacity+",
            "hue*",
            "translate",
            "rotate",
            "emit",
            "loop",
            "repeat",
            "flair",
            "fireworks",
            "character",
            "text",
            "block",
            "each-choice",
            "random-choice",
            "each-range",
            "random-range",
            "each-angle",
            "random-angle",
        ] {
            assert!(registry.contains(name), "missing {}", name);
        }
        assert_eq!(registry.len(), 36);
        assert_eq!(registry.names().next(), Some("linear"));
    }

    #[test]
    fn test_lookup() {
        let registry = Registry::builtin();
        assert_eq!(
            registry.get("speed*"),
            Some(Builtin::Constructor(Constructor::Scalar(ScalarOp::Multiply, Scalar::Speed)))
        );
        assert_eq!(registry.get("random-angle"), Some(Builtin::Angle(Selection::Random)));
        assert_eq!(registry.get("bloomVoice"), Some(Builtin::Action(Action::Voice(Cue::Bloom))));
        assert_eq!(registry.get("sparkle"), None);
    }

    #[test]
    fn test_register_overrides() {
        let mut registry = Registry::builtin();
        let previous = registry.register("nop", Builtin::Action(Action::Close));
        assert_eq!(previous, Some(Builtin::Action(Action::Nop)));
        assert_eq!(registry.get("nop"), Some(Builtin::Action(Action::Close)));
        assert!(Registry::new().is_empty());
    }

    #[test]
    fn test_arity() {
        assert_eq!(Constructor::Emit.arity(), 4);
        assert_eq!(Constructor::Text.arity(), 5);
        assert_eq!(Constructor::Loop.arity(), 1);
    }
}
