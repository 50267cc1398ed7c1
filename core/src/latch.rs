//! Clocked state: latch, flip-flop, register, program counter.
//!
//! Sequential behavior falls out of one trick: a select whose own output
//! is also its fallback input. Everything here is still NAND underneath;
//! only the wiring differs from the combinational library.

use crate::arith::Inc16Gate;
use crate::gate::{Gate, TieHighGate};
use crate::logic::{AndGate, NotGate, SelectGate, SelectNGate};
use crate::signal::{Bus16, Signal};

/// Level-sensitive data latch: `out = SELECT(st, d, out)`.
///
/// While `st` is high the output tracks `d`; while it is low the select
/// falls back to the output's own cell, so a single pass is a fixed point
/// and the old level survives. This feedback edge is the only sanctioned
/// combinational loop in the network. The output is unspecified until `st`
/// is first asserted.
pub struct DataLatchGate {
    mux: SelectGate,
}

impl DataLatchGate {
    /// Wire a latch between a store-enable line, a data line and an
    /// output line.
    #[must_use]
    pub fn new(st: &Signal, d: &Signal, out: &Signal) -> Self {
        Self {
            mux: SelectGate::new(st, d, out, out),
        }
    }
}

impl Gate for DataLatchGate {
    fn update(&mut self) {
        self.mux.update();
    }
}

/// Edge-triggered D flip-flop, master-slave.
///
/// The master latch is open while `clk` is high (gated by `st`), the
/// slave while `clk` is low. A value present on `in` during the high
/// phase is captured by the master and becomes visible on `out` once the
/// clock falls, which is why a register write takes both update passes of
/// a cycle to observe.
pub struct DataFlipFlop {
    enable: AndGate,
    master: DataLatchGate,
    invert: NotGate,
    slave: DataLatchGate,
}

impl DataFlipFlop {
    /// Wire a flip-flop between a store-enable line, a data line, the
    /// clock and an output line.
    #[must_use]
    pub fn new(st: &Signal, input: &Signal, clk: &Signal, out: &Signal) -> Self {
        let gated = Signal::new();
        let held = Signal::new();
        let clk_n = Signal::new();

        Self {
            enable: AndGate::new(st, clk, &gated),
            master: DataLatchGate::new(&gated, input, &held),
            invert: NotGate::new(clk, &clk_n),
            slave: DataLatchGate::new(&clk_n, &held, out),
        }
    }
}

impl Gate for DataFlipFlop {
    fn update(&mut self) {
        self.enable.update();
        self.master.update();
        self.invert.update();
        self.slave.update();
    }
}

/// 16-bit register: sixteen flip-flops sharing one store-enable and one
/// clock, capturing a whole bus atomically.
pub struct Register {
    bits: Vec<DataFlipFlop>,
}

impl Register {
    /// Wire a register between a store-enable line, an input bus, the
    /// clock and an output bus.
    #[must_use]
    pub fn new(st: &Signal, input: &Bus16, clk: &Signal, out: &Bus16) -> Self {
        Self {
            bits: (0..16)
                .map(|i| DataFlipFlop::new(st, &input.line(i), clk, &out.line(i)))
                .collect(),
        }
    }
}

impl Gate for Register {
    fn update(&mut self) {
        for bit in &mut self.bits {
            bit.update();
        }
    }
}

/// Program counter: on each clock, load `x` (when `load` is high) or
/// increment.
///
/// The backing register's store-enable is tied high, so something is
/// captured on every rising edge; `load` only steers which candidate.
pub struct Counter {
    always: TieHighGate,
    inc: Inc16Gate,
    mux: SelectNGate<16>,
    reg: Register,
}

impl Counter {
    /// Wire a counter between a load line, a load-value bus, the clock
    /// and an output bus.
    #[must_use]
    pub fn new(load: &Signal, x: &Bus16, clk: &Signal, out: &Bus16) -> Self {
        let store = Signal::new();
        let next = Bus16::new();
        let chosen = Bus16::new();

        Self {
            always: TieHighGate::new(&store),
            inc: Inc16Gate::new(out, &next),
            mux: SelectNGate::new(load, x, &next, &chosen),
            reg: Register::new(&store, &chosen, clk, out),
        }
    }
}

impl Gate for Counter {
    fn update(&mut self) {
        self.always.update();
        self.inc.update();
        self.mux.update();
        self.reg.update();
    }
}
