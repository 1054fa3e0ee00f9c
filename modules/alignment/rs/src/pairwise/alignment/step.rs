use std::borrow::Borrow;
use std::fmt::Display;

use derive_getters::{Dissolve, Getters};
use eyre::Result;

use sermo_core_rs::num::PrimUInt;

use super::op::Op;

/// A run of identical alignment operations.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Getters, Dissolve)]
pub struct Step<Len: PrimUInt> {
    /// Number of repetitions, always greater than zero.
    len: Len,
    op: Op,
}

impl<Len: PrimUInt> Step<Len> {
    pub fn new(op: Op, len: Len) -> Result<Self> {
        if len.is_zero() {
            return Err(eyre::eyre!("Step length must be greater than zero"));
        }
        Ok(Self { len, op })
    }

    /// Append a single operation to a run-length encoded path. Runs that would overflow `Len`
    /// are continued in a new step.
    pub fn push(steps: &mut Vec<Step<Len>>, op: Op) {
        if let Some(last) = steps.last_mut() {
            if last.op == op && last.len < Len::max_value() {
                last.len = last.len + Len::one();
                return;
            }
        }
        steps.push(Step { len: Len::one(), op });
    }

    pub fn rle_string(steps: impl Iterator<Item: Borrow<Step<Len>>>) -> String
    where
        Len: Display,
    {
        let mut result = String::new();
        for step in steps {
            let step = step.borrow();
            result.push_str(&step.len.to_string());
            result.push(step.op.symbol());
        }
        result
    }
}
