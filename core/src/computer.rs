//! The machine: ROM, program counter, control unit and memory, wired
//! through an external clock.

use crate::control::{ControlLines, ControlUnit};
use crate::gate::Gate;
use crate::isa::Program;
use crate::latch::Counter;
use crate::logic::AndGate;
use crate::mem::{MemoryUnit, Rom16x16};
use crate::signal::{Bus16, Signal};

/// A 16-bit stored-program computer built from NAND.
///
/// The caller owns the `clk` and `halt` lines. One machine cycle is a
/// rising edge and a falling edge, each followed by one `update` pass:
///
/// ```text
/// clk.set(true);  computer.update();
/// clk.set(false); computer.update();
/// ```
///
/// Per pass, the ROM settles the instruction for the current PC, the
/// control unit decodes it against the current registers, the memory unit
/// latches the result into whichever targets are enabled, the counter
/// picks the next PC (A on a jump, PC + 1 otherwise), and the halt gate
/// raises `halt` on a compute word with bit 14 set. Register writes
/// become observable after the falling edge.
pub struct Computer {
    rom: Rom16x16,
    control: ControlUnit,
    memory: MemoryUnit,
    counter: Counter,
    halt_gate: AndGate,
    pc: Bus16,
    a: Bus16,
    d: Bus16,
    pa: Bus16,
}

impl Computer {
    /// Build the machine around a program image and the externally owned
    /// clock and halt lines.
    #[must_use]
    pub fn new(program: &Program, clk: &Signal, halt: &Signal) -> Self {
        let pc = Bus16::new();
        let a = Bus16::new();
        let d = Bus16::new();
        let pa = Bus16::new();
        let instr = Bus16::new();
        let control_lines = ControlLines::new();

        // The halt flag is control, so it only counts on a compute word;
        // bit 14 of a constant load is payload.
        let halt_gate = AndGate::new(&instr.line(15), &instr.line(14), halt);

        Self {
            rom: Rom16x16::new(program, &pc.slice::<4>(0), &instr),
            control: ControlUnit::new(&instr, &a, &d, &pa, &control_lines),
            memory: MemoryUnit::new(
                &control_lines.sel_a,
                &control_lines.sel_d,
                &control_lines.sel_pa,
                &control_lines.r,
                clk,
                &a,
                &d,
                &pa,
            ),
            counter: Counter::new(&control_lines.j, &a, clk, &pc),
            halt_gate,
            pc,
            a,
            d,
            pa,
        }
    }

    /// Return the program counter.
    #[must_use]
    pub fn pc(&self) -> u16 {
        self.pc.value()
    }

    /// Return register A.
    #[must_use]
    pub fn a(&self) -> u16 {
        self.a.value()
    }

    /// Return register D.
    #[must_use]
    pub fn d(&self) -> u16 {
        self.d.value()
    }

    /// Return the RAM word addressed by A.
    #[must_use]
    pub fn pa(&self) -> u16 {
        self.pa.value()
    }
}

impl Gate for Computer {
    fn update(&mut self) {
        self.rom.update();
        self.control.update();
        self.memory.update();
        self.counter.update();
        self.halt_gate.update();
    }
}
