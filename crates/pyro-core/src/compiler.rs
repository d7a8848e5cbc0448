//! Unit resolution
//!
//! Compilation happens in two phases. Resolving an [`Ast`] produces a
//! [`Unit`]: applying arguments only records them. Coercing a unit to a
//! number, string, easing or behavior is what compiles the recorded
//! arguments, so one syntactic form may mean different things depending
//! on where it appears. `180 ease-out explode` is a number applied to an
//! easing applied to a behavior; coerced to a behavior it reads "explode,
//! eased out, over 180 time units".

use crate::ast::{Ast, BLOCK};
use crate::easing::Easing;
use crate::error::{Error, Result};
use crate::gen::{BehaviorGen, Choice, EasingGen, NumberGen, Selection, StringGen, Vec3Gen};
use crate::registry::{Action, Builtin, Constructor, Registry};
use log::debug;
use std::rc::Rc;

/// Compile-time value
#[derive(Debug, Clone)]
enum Unit {
    /// The empty list
    Nil,
    Number(f64),
    /// A string literal, or an unknown symbol
    Str(String),
    Easing(Easing),
    Action {
        name: String,
        action: Action,
    },
    Angle {
        name: String,
        selection: Selection,
    },
    /// A registered name that only means something once applied
    Head {
        name: String,
        builtin: Builtin,
    },
    Constructed {
        name: String,
        constructor: Constructor,
        args: Vec<Ast>,
    },
    Block(Vec<Ast>),
    Choice {
        name: String,
        selection: Selection,
        options: Vec<Ast>,
        /// Argument lists applied to the choice, forwarded to every option
        applied: Vec<Vec<Ast>>,
    },
    Range {
        name: String,
        selection: Selection,
        args: Vec<Ast>,
    },
    PutLifespan {
        unit: Box<Unit>,
        args: Vec<Ast>,
    },
    PutEasing {
        unit: Box<Unit>,
        args: Vec<Ast>,
    },
}

impl Unit {
    fn from_builtin(name: &str, builtin: Builtin) -> Self {
        let name = name.to_string();
        match builtin {
            Builtin::Easing(easing) => Unit::Easing(easing),
            Builtin::Action(action) => Unit::Action { name, action },
            Builtin::Angle(selection) => Unit::Angle { name, selection },
            Builtin::Constructor(_) | Builtin::Block | Builtin::Choice(_) | Builtin::Range(_) => {
                Unit::Head { name, builtin }
            }
        }
    }

    /// Name used in error messages
    fn name(&self) -> String {
        match self {
            Unit::Nil => "nil".to_string(),
            Unit::Number(_) => "number".to_string(),
            Unit::Str(_) => "string".to_string(),
            Unit::Easing(easing) => easing.name().to_string(),
            Unit::Block(_) => BLOCK.to_string(),
            Unit::PutLifespan { .. } => "lifespan".to_string(),
            Unit::PutEasing { .. } => "easing".to_string(),
            Unit::Action { name, .. }
            | Unit::Angle { name, .. }
            | Unit::Head { name, .. }
            | Unit::Constructed { name, .. }
            | Unit::Choice { name, .. }
            | Unit::Range { name, .. } => name.clone(),
        }
    }

    /// Record arguments applied to this unit
    ///
    /// Numbers, strings and ranges applied to arguments become a lifespan
    /// for the body; easings become its easing.
    fn with_arguments(self, args: Vec<Ast>) -> Result<Unit> {
        match self {
            Unit::Number(_) | Unit::Str(_) | Unit::Range { .. } => Ok(Unit::PutLifespan {
                unit: Box::new(self),
                args,
            }),
            Unit::Easing(_) => Ok(Unit::PutEasing {
                unit: Box::new(self),
                args,
            }),
            Unit::Head { name, builtin } => match builtin {
                Builtin::Constructor(constructor) => Ok(Unit::Constructed {
                    name,
                    constructor,
                    args,
                }),
                Builtin::Block => Ok(Unit::Block(args)),
                Builtin::Choice(selection) => Ok(Unit::Choice {
                    name,
                    selection,
                    options: args,
                    applied: Vec::new(),
                }),
                Builtin::Range(selection) => Ok(Unit::Range {
                    name,
                    selection,
                    args,
                }),
                Builtin::Easing(_) | Builtin::Action(_) | Builtin::Angle(_) => {
                    Err(Error::NoArgumentsAllowed(name))
                }
            },
            Unit::Choice {
                name,
                selection,
                options,
                mut applied,
            } => {
                applied.push(args);
                Ok(Unit::Choice {
                    name,
                    selection,
                    options,
                    applied,
                })
            }
            other => Err(Error::NoArgumentsAllowed(other.name())),
        }
    }

    fn number(&self, compiler: &Compiler) -> Result<NumberGen> {
        match self {
            Unit::Number(value) => Ok(NumberGen::Const(*value)),
            Unit::Angle { selection, .. } => Ok(NumberGen::Angle(*selection)),
            Unit::Range {
                name,
                selection,
                args,
            } => match args.as_slice() {
                [min, max] => Ok(NumberGen::Range {
                    selection: *selection,
                    min: Box::new(compiler.compile_number(min)?),
                    max: Box::new(compiler.compile_number(max)?),
                }),
                _ => Err(Error::arity(name.as_str(), 2, args.len())),
            },
            Unit::Choice {
                name,
                selection,
                options,
                applied,
            } => compiler
                .choose(name, *selection, options, applied, |unit| unit.number(compiler))
                .map(NumberGen::Choice),
            other => Err(Error::mismatch("number", other.name())),
        }
    }

    fn string(&self, compiler: &Compiler) -> Result<StringGen> {
        match self {
            Unit::Str(value) => Ok(StringGen::Const(value.clone())),
            Unit::Choice {
                name,
                selection,
                options,
                applied,
            } => compiler
                .choose(name, *selection, options, applied, |unit| unit.string(compiler))
                .map(StringGen::Choice),
            other => Err(Error::mismatch("string", other.name())),
        }
    }

    fn easing(&self, compiler: &Compiler) -> Result<EasingGen> {
        match self {
            Unit::Easing(easing) => Ok(EasingGen::Const(*easing)),
            Unit::Choice {
                name,
                selection,
                options,
                applied,
            } => compiler
                .choose(name, *selection, options, applied, |unit| unit.easing(compiler))
                .map(EasingGen::Choice),
            other => Err(Error::mismatch("easing", other.name())),
        }
    }

    fn behavior(&self, compiler: &Compiler) -> Result<BehaviorGen> {
        match self {
            Unit::Action { action, .. } => Ok(match action {
                Action::Nop => BehaviorGen::Nop,
                Action::Close => BehaviorGen::Close,
                Action::Explode => BehaviorGen::Explode,
                Action::Voice(cue) => BehaviorGen::Voice(*cue),
            }),
            Unit::Constructed {
                name,
                constructor,
                args,
            } => compiler.construct(name, *constructor, args),
            Unit::Block(lanes) => lanes
                .iter()
                .map(|lane| match lane {
                    Ast::List(statements) => statements
                        .iter()
                        .map(|statement| compiler.compile(statement))
                        .collect::<Result<Vec<_>>>(),
                    other => Err(Error::mismatch("list", other.type_name())),
                })
                .collect::<Result<Vec<_>>>()
                .map(BehaviorGen::Block),
            Unit::Choice {
                name,
                selection,
                options,
                applied,
            } => compiler
                .choose(name, *selection, options, applied, |unit| unit.behavior(compiler))
                .map(BehaviorGen::Choice),
            Unit::PutLifespan { unit, args } => {
                let body = compiler.compile_body(args)?;
                Ok(BehaviorGen::Lifespan {
                    lifespan: unit.number(compiler)?,
                    body: Box::new(body),
                })
            }
            Unit::PutEasing { unit, args } => {
                let body = compiler.compile_body(args)?;
                Ok(BehaviorGen::Eased {
                    easing: unit.easing(compiler)?,
                    body: Box::new(body),
                })
            }
            other => Err(Error::mismatch("behavior", other.name())),
        }
    }
}

/// Compiles parsed programs into behavior generators
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    registry: Registry,
}

impl Compiler {
    /// Create a compiler over the builtin names
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compiler over a custom registry
    pub fn with_registry(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Compile a program
    ///
    /// A single statement compiles on its own; several run in order, as
    /// one lane of a block.
    pub fn compile_program(&self, program: &[Ast]) -> Result<BehaviorGen> {
        let gen = match program {
            [statement] => self.compile(statement)?,
            _ => self.compile(&Ast::block([program.to_vec()]))?,
        };
        debug!("Compiled program of {} statement(s)", program.len());
        Ok(gen)
    }

    /// Compile an expression to a behavior generator
    pub fn compile(&self, ast: &Ast) -> Result<BehaviorGen> {
        self.resolve(ast)?.behavior(self)
    }

    /// Compile an expression to a number generator
    pub fn compile_number(&self, ast: &Ast) -> Result<NumberGen> {
        self.resolve(ast)?.number(self)
    }

    /// Compile an expression to a string generator
    pub fn compile_string(&self, ast: &Ast) -> Result<StringGen> {
        self.resolve(ast)?.string(self)
    }

    /// Compile an expression to an easing generator
    pub fn compile_easing(&self, ast: &Ast) -> Result<EasingGen> {
        self.resolve(ast)?.easing(self)
    }

    fn resolve(&self, ast: &Ast) -> Result<Unit> {
        match ast {
            Ast::Number(value) => Ok(Unit::Number(*value)),
            Ast::Symbol(name) => Ok(match self.registry.get(name) {
                Some(builtin) => Unit::from_builtin(name, builtin),
                None => {
                    debug!("Unknown symbol {:?} treated as a string", name);
                    Unit::Str(name.clone())
                }
            }),
            Ast::List(elements) => match elements.split_first() {
                None => Ok(Unit::Nil),
                Some((head, args)) => self.resolve(head)?.with_arguments(args.to_vec()),
            },
        }
    }

    /// Body of a lifespan or easing wrapper; several arguments nest as a list
    fn compile_body(&self, args: &[Ast]) -> Result<BehaviorGen> {
        match args {
            [body] => self.compile(body),
            _ => self.compile(&Ast::List(args.to_vec())),
        }
    }

    fn choose<G>(
        &self,
        name: &str,
        selection: Selection,
        options: &[Ast],
        applied: &[Vec<Ast>],
        coerce: impl Fn(&Unit) -> Result<G>,
    ) -> Result<Choice<G>> {
        if options.is_empty() {
            return Err(Error::arity(name, "at least 1", 0));
        }
        let options = options
            .iter()
            .map(|option| {
                let mut unit = self.resolve(option)?;
                for args in applied {
                    unit = unit.with_arguments(args.clone())?;
                }
                coerce(&unit)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Choice { selection, options })
    }

    fn vec3(&self, x: &Ast, y: &Ast, z: &Ast) -> Result<Vec3Gen> {
        Ok(Vec3Gen {
            x: self.compile_number(x)?,
            y: self.compile_number(y)?,
            z: self.compile_number(z)?,
        })
    }

    fn construct(&self, name: &str, constructor: Constructor, args: &[Ast]) -> Result<BehaviorGen> {
        let gen = match (constructor, args) {
            (Constructor::Scalar(op, target), [value]) => BehaviorGen::Scalar {
                op,
                target,
                value: self.compile_number(value)?,
            },
            (Constructor::Translate, [x, y, z]) => BehaviorGen::Translate(self.vec3(x, y, z)?),
            (Constructor::Rotate, [x, y, z]) => BehaviorGen::Rotate(self.vec3(x, y, z)?),
            (Constructor::Emit, [count, times, parallel, body]) => BehaviorGen::Emit {
                count: self.compile_number(count)?,
                times: self.compile_number(times)?,
                parallel: self.compile_number(parallel)?,
                body: Rc::new(self.compile(body)?),
            },
            (Constructor::Loop, [body]) => BehaviorGen::Loop(Box::new(self.compile(body)?)),
            (Constructor::Repeat, [limit, body]) => BehaviorGen::Repeat {
                limit: self.compile_number(limit)?,
                body: Box::new(self.compile(body)?),
            },
            (Constructor::Flair, [count, body]) => BehaviorGen::Flair {
                count: self.compile_number(count)?,
                body: Rc::new(self.compile(body)?),
            },
            (Constructor::Fireworks, [count, body]) => BehaviorGen::Fireworks {
                count: self.compile_number(count)?,
                body: Rc::new(self.compile(body)?),
            },
            (Constructor::Character, [text, body]) => BehaviorGen::Character {
                text: self.compile_string(text)?,
                body: Rc::new(self.compile(body)?),
            },
            (Constructor::Text, [text, x, y, z, body]) => BehaviorGen::Text {
                text: self.compile_string(text)?,
                offset: self.vec3(x, y, z)?,
                body: Rc::new(self.compile(body)?),
            },
            _ => return Err(Error::arity(name, constructor.arity(), args.len())),
        };
        Ok(gen)
    }
}
