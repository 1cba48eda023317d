use crate::helpers::*;
use common::asm::Reg;
use common::constants::PC_START;
use emu_lib::Cond;
use emu_lib::io::console::Console;

use std::time::Duration;

#[test]
fn ld() {
    let emu = run(&[
        0x2002, // ld r0, data
        HALT,
        0,
        0x8000, // data
    ]);
    assert_eq!(emu.reg_read_word(Reg::R0), 0x8000);
    assert_eq!(emu.cond(), Cond::Neg);
}

#[test]
fn ldi() {
    let (mut emu, _) = emulator(&[
        0xa001, // ldi r0, ptr
        HALT,
        0x4000, // ptr
    ]);
    emu.load_words(0x4000, &[0x0042]);
    emu.run().unwrap();
    assert_eq!(emu.reg_read_word(Reg::R0), 0x42);
    assert_eq!(emu.cond(), Cond::Pos);
}

#[test]
fn ldr() {
    let (mut emu, _) = emulator(&[
        0x607e, // ldr r0, r1, #-2
        HALT,
    ]);
    emu.load_words(0x4000, &[7]);
    emu.reg_write_word(Reg::R1, 0x4002);
    emu.run().unwrap();
    assert_eq!(emu.reg_read_word(Reg::R0), 7);
    assert_eq!(emu.reg_read_word(Reg::R1), 0x4002);
}

#[test]
fn ldr_wraps() {
    let (mut emu, _) = emulator(&[
        0x6043, // ldr r0, r1, #3
        HALT,
    ]);
    emu.load_words(0x0002, &[0x1234]);
    emu.reg_write_word(Reg::R1, 0xffff);
    emu.run().unwrap();
    assert_eq!(emu.reg_read_word(Reg::R0), 0x1234);
}

#[test]
fn lea() {
    let emu = run(&[
        0xe1fd, // lea r0, #-3
        HALT,
    ]);
    assert_eq!(emu.reg_read_word(Reg::R0), PC_START + 1 - 3);
    assert_eq!(emu.cond(), Cond::Pos);
}

#[test]
fn lea_does_not_read() {
    // Pointing at the keyboard data register must not consume the key.
    let (mut emu, console) = emulator(&[]);
    emu.load_words(0xfdfe, &[
        0xe003, // lea r0, #3 ; kbdr
    ]);
    console.write_input(b"k");
    assert!(console.poll_key(Duration::ZERO).unwrap());
    emu.get_state_mut().set_pc(0xfdfe);
    emu.run_ins().unwrap();
    assert_eq!(emu.reg_read_word(Reg::R0), 0xfe02);
    assert_eq!(emu.cond(), Cond::Neg);
    assert_eq!(console.take_key(), Some(b'k'));
}

#[test]
fn st() {
    let (mut emu, _) = emulator(&[
        0x3001, // st r0, data
        HALT,
        0,      // data
    ]);
    emu.reg_write_word(Reg::R0, 0xabcd);
    emu.get_state_mut().set_cond(Cond::Pos);
    emu.run().unwrap();
    assert_eq!(emu.get_state().mem_read_word(PC_START + 2), 0xabcd);
    assert_eq!(emu.cond(), Cond::Pos);
}

#[test]
fn sti() {
    let (mut emu, _) = emulator(&[
        0xb001, // sti r0, ptr
        HALT,
        0x4000, // ptr
    ]);
    emu.reg_write_word(Reg::R0, 0x0bad);
    emu.run().unwrap();
    assert_eq!(emu.get_state().mem_read_word(0x4000), 0x0bad);
    assert_eq!(emu.get_state().mem_read_word(PC_START + 2), 0x4000);
}

#[test]
fn str() {
    let (mut emu, _) = emulator(&[
        0x7041, // str r0, r1, #1
        HALT,
    ]);
    emu.reg_write_word(Reg::R0, 0xffff);
    emu.reg_write_word(Reg::R1, 0x4000);
    emu.run().unwrap();
    assert_eq!(emu.get_state().mem_read_word(0x4001), 0xffff);
    assert_eq!(emu.cond(), Cond::Zero);
}

#[test]
fn store_then_load() {
    let emu = run(&[
        0x5020, // and r0, r0, #0
        0x102c, // add r0, r0, #12
        0x3003, // st r0, data
        0x2402, // ld r2, data
        HALT,
        0,
        0,      // data
    ]);
    assert_eq!(emu.reg_read_word(Reg::R2), 12);
    assert_eq!(emu.get_state().mem_read_word(PC_START + 6), 12);
}
