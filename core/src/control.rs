//! Instruction decoding, realized as gates on the instruction bus.
//!
//! Two datapaths run side by side every pass: the compute path (ALU,
//! condition unit, write-enable taps off the instruction lines) and the
//! constant-load path (the word itself as the result, store to A, no
//! jump). Bit 15 of the instruction steers a bank of selects between
//! them, so a constant load's low bits are payload and never control.

use crate::alu::{Alu, ConditionUnit};
use crate::gate::{Connector, Gate, TieHighGate};
use crate::logic::{SelectGate, SelectNGate};
use crate::signal::{Bus16, Signal};

/// The output lines of a control path: the result bus, the three write
/// enables, and the jump line.
///
/// Fields are handles, so cloning the bundle clones the wiring, not the
/// state.
#[derive(Clone, Debug)]
pub struct ControlLines {
    /// The 16-bit result routed to the writable targets.
    pub r: Bus16,
    /// The write enable for register A.
    pub sel_a: Signal,
    /// The write enable for register D.
    pub sel_d: Signal,
    /// The write enable for the RAM word addressed by A.
    pub sel_pa: Signal,
    /// The jump line: high loads the PC from A instead of incrementing.
    pub j: Signal,
}

impl ControlLines {
    /// Create a bundle over fresh cells.
    #[must_use]
    pub fn new() -> Self {
        Self {
            r: Bus16::new(),
            sel_a: Signal::new(),
            sel_d: Signal::new(),
            sel_pa: Signal::new(),
            j: Signal::new(),
        }
    }
}

impl Default for ControlLines {
    fn default() -> Self {
        Self::new()
    }
}

/// The compute-instruction datapath.
///
/// Wires the ALU's X operand to D and its Y operand to A or the RAM word
/// at A (bit 12), runs the condition unit over the result, and taps the
/// write enables straight off instruction bits 5..3.
pub struct ComputePath {
    pick_y: SelectNGate<16>,
    alu: Alu,
    cond: ConditionUnit,
    tap_a: Connector,
    tap_d: Connector,
    tap_pa: Connector,
}

impl ComputePath {
    /// Wire the path between the instruction bus, the current register
    /// buses and an output bundle.
    #[must_use]
    pub fn new(instr: &Bus16, a: &Bus16, d: &Bus16, pa: &Bus16, out: &ControlLines) -> Self {
        let y = Bus16::new();

        Self {
            pick_y: SelectNGate::new(&instr.line(12), pa, a, &y),
            alu: Alu::new(
                &instr.line(10),
                &instr.line(9),
                &instr.line(8),
                &instr.line(7),
                &instr.line(6),
                d,
                &y,
                &out.r,
            ),
            cond: ConditionUnit::new(
                &instr.line(2),
                &instr.line(1),
                &instr.line(0),
                &out.r,
                &out.j,
            ),
            tap_a: Connector::new(&instr.line(5), &out.sel_a),
            tap_d: Connector::new(&instr.line(4), &out.sel_d),
            tap_pa: Connector::new(&instr.line(3), &out.sel_pa),
        }
    }
}

impl Gate for ComputePath {
    fn update(&mut self) {
        self.pick_y.update();
        self.alu.update();
        self.cond.update();
        self.tap_a.update();
        self.tap_d.update();
        self.tap_pa.update();
    }
}

/// A bank of selects steering one of two control-line bundles to the
/// output bundle.
pub struct ControlSelector {
    pick_r: SelectNGate<16>,
    pick_a: SelectGate,
    pick_d: SelectGate,
    pick_pa: SelectGate,
    pick_j: SelectGate,
}

impl ControlSelector {
    /// Wire the selector: `out = s ? on : off`, line for line.
    #[must_use]
    pub fn new(s: &Signal, on: &ControlLines, off: &ControlLines, out: &ControlLines) -> Self {
        Self {
            pick_r: SelectNGate::new(s, &on.r, &off.r, &out.r),
            pick_a: SelectGate::new(s, &on.sel_a, &off.sel_a, &out.sel_a),
            pick_d: SelectGate::new(s, &on.sel_d, &off.sel_d, &out.sel_d),
            pick_pa: SelectGate::new(s, &on.sel_pa, &off.sel_pa, &out.sel_pa),
            pick_j: SelectGate::new(s, &on.j, &off.j, &out.j),
        }
    }
}

impl Gate for ControlSelector {
    fn update(&mut self) {
        self.pick_r.update();
        self.pick_a.update();
        self.pick_d.update();
        self.pick_pa.update();
        self.pick_j.update();
    }
}

/// The control unit: compute path and constant-load path, selected by
/// bit 15 of the instruction.
///
/// The constant-load bundle needs no gates of its own: its result bus is
/// a view of the instruction bus, its A write-enable is a tied-high line,
/// and the remaining lines are undriven lows.
pub struct ControlUnit {
    compute: ComputePath,
    one: TieHighGate,
    selector: ControlSelector,
}

impl ControlUnit {
    /// Wire the unit between the instruction bus, the current register
    /// buses and an output bundle.
    #[must_use]
    pub fn new(instr: &Bus16, a: &Bus16, d: &Bus16, pa: &Bus16, out: &ControlLines) -> Self {
        let compute_lines = ControlLines::new();
        let compute = ComputePath::new(instr, a, d, pa, &compute_lines);

        let store_a = Signal::new();
        let low = Signal::new();
        let load_lines = ControlLines {
            r: instr.clone(),
            sel_a: store_a.clone(),
            sel_d: low.clone(),
            sel_pa: low.clone(),
            j: low,
        };

        Self {
            compute,
            one: TieHighGate::new(&store_a),
            selector: ControlSelector::new(&instr.line(15), &compute_lines, &load_lines, out),
        }
    }
}

impl Gate for ControlUnit {
    fn update(&mut self) {
        self.compute.update();
        self.one.update();
        self.selector.update();
    }
}
