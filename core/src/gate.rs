//! The gate capability and the NAND primitive.
//!
//! Every element of the network, from a single NAND to the whole computer,
//! exposes one operation: `update`, which recomputes outputs from the
//! current levels of the inputs. Composite gates own their internal cells
//! and subgates and call the subgates in a fixed order chosen so that any
//! consumer's inputs are refreshed before it runs; nothing is sorted at
//! run time.

use crate::signal::Signal;

/// An element wired into a signal network.
pub trait Gate {
    /// Recompute this gate's outputs from its current inputs.
    fn update(&mut self);
}

/// The fundamental gate, upon which all others are built.
pub struct NandGate {
    a: Signal,
    b: Signal,
    out: Signal,
}

impl NandGate {
    /// Wire a NAND between two input lines and an output line.
    #[must_use]
    pub fn new(a: &Signal, b: &Signal, out: &Signal) -> Self {
        Self {
            a: a.clone(),
            b: b.clone(),
            out: out.clone(),
        }
    }
}

impl Gate for NandGate {
    fn update(&mut self) {
        self.out.set(!(self.a.get() && self.b.get()));
    }
}

/// A direct connection between two signals.
pub struct Connector {
    input: Signal,
    out: Signal,
}

impl Connector {
    /// Wire the input line straight through to the output line.
    #[must_use]
    pub fn new(input: &Signal, out: &Signal) -> Self {
        Self {
            input: input.clone(),
            out: out.clone(),
        }
    }
}

impl Gate for Connector {
    fn update(&mut self) {
        self.out.set(self.input.get());
    }
}

/// A tie-high cell: a constant logical-one source.
///
/// Realized as a NAND with both inputs on a line nothing drives. The line
/// reads low, so the output reads high on every pass. Wherever the network
/// needs a literal 1 (a subtractor's +1, a counter's always-store enable),
/// it draws from one of these rather than from an integer.
pub struct TieHighGate {
    nand: NandGate,
}

impl TieHighGate {
    /// Drive the output line constantly high.
    #[must_use]
    pub fn new(out: &Signal) -> Self {
        let low = Signal::new();

        Self {
            nand: NandGate::new(&low, &low, out),
        }
    }
}

impl Gate for TieHighGate {
    fn update(&mut self) {
        self.nand.update();
    }
}
