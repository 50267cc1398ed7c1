//! Terminal driver for the NAND computer.
//!
//! Loads the canonical countdown program, pulses the clock, and prints
//! one line of machine state per cycle until the halt line goes high.

use nandloom_core::computer::Computer;
use nandloom_core::gate::Gate;
use nandloom_core::isa::{
    Instruction, Program, COND_GT, COND_LT, DEST_D, HALT, OP_ADD, OP_DEC, ZX,
};
use nandloom_core::signal::Signal;

/// A short annotation for the word about to execute.
fn annotate(word: Instruction) -> &'static str {
    if !word.ci() {
        " load"
    } else if word.halt() {
        " halt"
    } else {
        ""
    }
}

fn main() {
    let program = Program::from_words(&[
        0x0004,
        OP_ADD | ZX | DEST_D, // D = A
        0x0003,
        OP_DEC | DEST_D | COND_LT | COND_GT, // D -= 1; jump to A while D != 0
        HALT,
    ]);

    let clk = Signal::new();
    let halt = Signal::new();
    let mut computer = Computer::new(&program, &clk, &halt);

    while !halt.get() {
        // The fetch wraps the same way the ROM's four address lines do.
        let word = Instruction::from(program.words()[usize::from(computer.pc() & 0xf)]);
        println!(
            "PC:{:04x} A:{:04x} D:{:04x} PA:{:04x} IR:{:04x}{}",
            computer.pc(),
            computer.a(),
            computer.d(),
            computer.pa(),
            word.word(),
            annotate(word)
        );

        clk.set(true);
        computer.update();
        clk.set(false);
        computer.update();
    }
}
