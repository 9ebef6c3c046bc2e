//! Exception types exposed to scripts.
//!
//! Scripts can name, raise, and construct these. Every failure the
//! evaluator produces carries one, so a handler's bound exception value has
//! the same shape whether the error came from a script `raise` or from an
//! evaluator check.

use std::fmt;

use super::Value;
use crate::errors::ErrorKind;

/// Closed set of exception classes available in the namespace.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExcType {
    BaseException,
    Exception,
    ArithmeticError,
    AssertionError,
    AttributeError,
    EOFError,
    FloatingPointError,
    ImportError,
    IndentationError,
    IndexError,
    KeyError,
    LookupError,
    MemoryError,
    NameError,
    NotImplementedError,
    OSError,
    OverflowError,
    RecursionError,
    RuntimeError,
    StopIteration,
    SyntaxError,
    TypeError,
    UnboundLocalError,
    UnicodeError,
    ValueError,
    ZeroDivisionError,
}

impl ExcType {
    /// Every class, in namespace seeding order.
    pub const ALL: &'static [ExcType] = &[
        ExcType::BaseException,
        ExcType::Exception,
        ExcType::ArithmeticError,
        ExcType::AssertionError,
        ExcType::AttributeError,
        ExcType::EOFError,
        ExcType::FloatingPointError,
        ExcType::ImportError,
        ExcType::IndentationError,
        ExcType::IndexError,
        ExcType::KeyError,
        ExcType::LookupError,
        ExcType::MemoryError,
        ExcType::NameError,
        ExcType::NotImplementedError,
        ExcType::OSError,
        ExcType::OverflowError,
        ExcType::RecursionError,
        ExcType::RuntimeError,
        ExcType::StopIteration,
        ExcType::SyntaxError,
        ExcType::TypeError,
        ExcType::UnboundLocalError,
        ExcType::UnicodeError,
        ExcType::ValueError,
        ExcType::ZeroDivisionError,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ExcType::BaseException => "BaseException",
            ExcType::Exception => "Exception",
            ExcType::ArithmeticError => "ArithmeticError",
            ExcType::AssertionError => "AssertionError",
            ExcType::AttributeError => "AttributeError",
            ExcType::EOFError => "EOFError",
            ExcType::FloatingPointError => "FloatingPointError",
            ExcType::ImportError => "ImportError",
            ExcType::IndentationError => "IndentationError",
            ExcType::IndexError => "IndexError",
            ExcType::KeyError => "KeyError",
            ExcType::LookupError => "LookupError",
            ExcType::MemoryError => "MemoryError",
            ExcType::NameError => "NameError",
            ExcType::NotImplementedError => "NotImplementedError",
            ExcType::OSError => "OSError",
            ExcType::OverflowError => "OverflowError",
            ExcType::RecursionError => "RecursionError",
            ExcType::RuntimeError => "RuntimeError",
            ExcType::StopIteration => "StopIteration",
            ExcType::SyntaxError => "SyntaxError",
            ExcType::TypeError => "TypeError",
            ExcType::UnboundLocalError => "UnboundLocalError",
            ExcType::UnicodeError => "UnicodeError",
            ExcType::ValueError => "ValueError",
            ExcType::ZeroDivisionError => "ZeroDivisionError",
        }
    }

    /// Immediate base class. `None` only for `BaseException`.
    pub fn parent(self) -> Option<ExcType> {
        match self {
            ExcType::BaseException => None,
            ExcType::Exception => Some(ExcType::BaseException),
            ExcType::FloatingPointError | ExcType::OverflowError | ExcType::ZeroDivisionError => {
                Some(ExcType::ArithmeticError)
            }
            ExcType::IndexError | ExcType::KeyError => Some(ExcType::LookupError),
            ExcType::NotImplementedError | ExcType::RecursionError => Some(ExcType::RuntimeError),
            ExcType::IndentationError => Some(ExcType::SyntaxError),
            ExcType::UnboundLocalError => Some(ExcType::NameError),
            ExcType::UnicodeError => Some(ExcType::ValueError),
            _ => Some(ExcType::Exception),
        }
    }

    /// Whether `self` is `other` or derives from it.
    pub fn is_subclass_of(self, other: ExcType) -> bool {
        let mut current = Some(self);
        while let Some(ty) = current {
            if ty == other {
                return true;
            }
            current = ty.parent();
        }
        false
    }

    /// Failure category for an exception raised by a script.
    pub fn kind(self) -> ErrorKind {
        match self {
            ExcType::SyntaxError | ExcType::IndentationError => ErrorKind::Syntax,
            ExcType::NameError | ExcType::UnboundLocalError => ErrorKind::Name,
            ExcType::AttributeError => ErrorKind::Attribute,
            ExcType::TypeError => ErrorKind::Type,
            ExcType::NotImplementedError => ErrorKind::Unsupported,
            ExcType::AssertionError => ErrorKind::Assertion,
            _ => ErrorKind::Runtime,
        }
    }

    pub fn from_name(name: &str) -> Option<ExcType> {
        ExcType::ALL.iter().copied().find(|ty| ty.name() == name)
    }
}

impl fmt::Display for ExcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An exception object: its class plus the constructor arguments.
#[derive(Clone, Debug)]
pub struct ExceptionValue {
    pub exc: ExcType,
    pub args: Vec<Value>,
}

impl ExceptionValue {
    pub fn new(exc: ExcType, args: Vec<Value>) -> Self {
        ExceptionValue { exc, args }
    }

    /// Build from a message, as evaluator failures do.
    pub fn with_message(exc: ExcType, message: &str) -> Self {
        let args = if message.is_empty() {
            Vec::new()
        } else {
            vec![Value::from(message)]
        };
        ExceptionValue { exc, args }
    }

    /// The arguments rendered and joined by single spaces.
    pub fn message(&self) -> String {
        self.args
            .iter()
            .map(super::repr::to_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
