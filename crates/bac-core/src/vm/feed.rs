//! Feeding
//!
//! A feeder assembles one logical operation from several instructions:
//! `fi` opens it, each `pu` delivers a token, `ff` completes it. Feeders
//! stack, and only the innermost one receives tokens.
//!
//! Completing a feeder yields a [`Completion`] describing its effect; the
//! virtual machine applies it to scopes, buffer, or reading stack. The
//! feeder stays on the stack until the effect has been applied.

use crate::error::{BacError, BacResult};
use super::value::{Comparison, Variable, VariableKind};

/// Feed tag opening a native function call
pub const FEED_FUNCTION: &str = "f";

/// Feed tag opening a variable declaration
pub const FEED_VARIABLE: &str = "v";

/// In-progress comparison: two folded operands
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonFeeder {
    kind: Comparison,
    operands: Vec<Variable>,
}

/// In-progress native call: a name, then any number of folded arguments
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CallFeeder {
    name: Option<String>,
    arguments: Vec<Variable>,
}

/// In-progress declaration: name, type tag, value text
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeclarationFeeder {
    name: Option<String>,
    kind: Option<VariableKind>,
    value: Option<Variable>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Feeder {
    Comparison(ComparisonFeeder),
    Call(CallFeeder),
    Declaration(DeclarationFeeder),
}

/// Effect of a completed feeder
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Open a reading frame gated by the comparison result
    Branch(bool),
    /// Invoke a native and buffer its rendered result
    Call { name: String, arguments: Vec<Variable> },
    /// Bind a variable in the current scope
    Declare { name: String, value: Variable },
}

impl Feeder {
    /// Open the feeder variant named by `tag`
    pub fn begin(tag: &str) -> BacResult<Self> {
        if let Some(kind) = Comparison::from_tag(tag) {
            return Ok(Feeder::Comparison(ComparisonFeeder {
                kind,
                operands: Vec::with_capacity(2),
            }));
        }
        match tag {
            FEED_FUNCTION => Ok(Feeder::Call(CallFeeder::default())),
            FEED_VARIABLE => Ok(Feeder::Declaration(DeclarationFeeder::default())),
            _ => Err(BacError::FeedType(tag.to_string())),
        }
    }

    /// Deliver one token
    pub fn feed(&mut self, token: &str) -> BacResult<()> {
        match self {
            Feeder::Comparison(feeder) => {
                if feeder.operands.len() >= 2 {
                    return Err(BacError::FeedSize);
                }
                feeder.operands.push(Variable::fold(token));
            }
            Feeder::Call(feeder) => {
                if feeder.name.is_none() {
                    feeder.name = Some(token.to_string());
                } else {
                    feeder.arguments.push(Variable::fold(token));
                }
            }
            Feeder::Declaration(feeder) => {
                let filled = (feeder.name.is_some(), feeder.kind, feeder.value.is_some());
                match filled {
                    (false, _, _) => feeder.name = Some(token.to_string()),
                    (true, None, _) => {
                        let kind = VariableKind::from_tag(token)
                            .ok_or_else(|| BacError::argument("pu", token))?;
                        feeder.kind = Some(kind);
                    }
                    (true, Some(kind), false) => {
                        feeder.value = Some(Variable::assign(kind, token)?);
                    }
                    (true, Some(_), true) => return Err(BacError::FeedSize),
                }
            }
        }
        Ok(())
    }

    /// Effect of the operation as fed so far; the feeder itself is untouched
    pub fn completion(&self) -> BacResult<Completion> {
        match self {
            Feeder::Comparison(feeder) => match feeder.operands.as_slice() {
                [a, b] => Ok(Completion::Branch(a.compare(feeder.kind, b)?)),
                _ => Err(BacError::FeedQuantity),
            },
            Feeder::Call(feeder) => Ok(Completion::Call {
                name: feeder.name.clone().unwrap_or_default(),
                arguments: feeder.arguments.clone(),
            }),
            Feeder::Declaration(feeder) => match (&feeder.name, &feeder.value) {
                (Some(name), Some(value)) => Ok(Completion::Declare {
                    name: name.clone(),
                    value: value.clone(),
                }),
                _ => Err(BacError::FeedSize),
            },
        }
    }
}

/// Stack of in-progress feeders
#[derive(Debug, Default)]
pub struct FeedingStack {
    feeders: Vec<Feeder>,
}

impl FeedingStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a feeder on top of the current one
    pub fn begin(&mut self, tag: &str) -> BacResult<()> {
        let feeder = Feeder::begin(tag)?;
        self.feeders.push(feeder);
        Ok(())
    }

    /// Deliver a token to the innermost feeder
    pub fn feed(&mut self, token: &str) -> BacResult<()> {
        self.feeders
            .last_mut()
            .ok_or(BacError::FeedSize)?
            .feed(token)
    }

    /// Effect of the innermost feeder, which stays open
    pub fn completion(&self) -> BacResult<Completion> {
        self.feeders.last().ok_or(BacError::FeedSize)?.completion()
    }

    /// Close the innermost feeder once its effect has been applied
    pub fn discard(&mut self) -> BacResult<()> {
        self.feeders.pop().map(drop).ok_or(BacError::FeedSize)
    }

    /// Complete and close the innermost feeder; a failure leaves it open
    pub fn finalize(&mut self) -> BacResult<Completion> {
        let completion = self.completion()?;
        self.discard()?;
        Ok(completion)
    }

    pub fn depth(&self) -> usize {
        self.feeders.len()
    }

    pub fn is_idle(&self) -> bool {
        self.feeders.is_empty()
    }

    pub fn clear(&mut self) {
        self.feeders.clear();
    }
}
