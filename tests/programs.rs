use emuchip::{CpuState, Emulator, EmulatorError, LoadError, OpCodes, Step};
use rand::rngs::mock::StepRng;

const NO_KEYS: [bool; 16] = [false; 16];

fn boot(words: &[u16]) -> Emulator {
    let mut emu = Emulator::with_rng(StepRng::new(0x5A, 1));
    let rom: Vec<u8> = words.iter().flat_map(|w| w.to_be_bytes()).collect();
    emu.load_rom(&rom).expect("rom fits");
    emu
}

#[test]
fn add_then_loop_back() {
    let mut emu = boot(&[0x6005, 0x7003, 0x1200]);
    for _ in 0..3 {
        emu.step(&NO_KEYS).unwrap();
    }
    assert_eq!(emu.regs.get(0x0), 8);
    assert_eq!(emu.pc.0, 0x200);
}

#[test]
fn subroutine_returns_after_call_site() {
    // 0x200 call 0x208; 0x202 V1 = 0x22; 0x204 jump self
    // 0x208 V0 = 0x11; 0x20A ret
    let mut emu = boot(&[0x2208, 0x6122, 0x1204, 0x0000, 0x6011, 0x00EE]);
    emu.run(5, &NO_KEYS).unwrap();
    assert_eq!(emu.regs.get(0x0), 0x11);
    assert_eq!(emu.regs.get(0x1), 0x22);
    assert_eq!(emu.pc.0, 0x204);
    assert_eq!(emu.stack.depth(), 0);
}

#[test]
fn sixteen_nested_calls_fit_seventeenth_overflows() {
    // every instruction calls the next one
    let words: Vec<u16> = (0..17).map(|n| 0x2202 + n * 2).collect();
    let mut emu = boot(&words);
    for _ in 0..16 {
        assert!(matches!(emu.step(&NO_KEYS), Ok(Step::Executed(OpCodes::PushSubroutine(_)))));
    }
    assert_eq!(emu.stack.depth(), 16);
    assert_eq!(
        emu.step(&NO_KEYS),
        Err(EmulatorError::StackOverflow { pc: 0x220 })
    );
    assert_eq!(emu.state(), CpuState::Halted);
    assert_eq!(emu.stack.depth(), 16);
}

#[test]
fn countdown_loop_with_delay_timer() {
    // V0 = 3; DT = V0; loop: V1 = DT; skip-if V1 == 0; jump loop; V2 = 1
    let mut emu = boot(&[0x6003, 0xF015, 0xF107, 0x3100, 0x1204, 0x6201, 0x120C]);
    emu.run(40, &NO_KEYS).unwrap();
    assert_eq!(emu.regs.get(0x1), 0);
    assert_eq!(emu.regs.get(0x2), 1);
    assert_eq!(emu.pc.0, 0x20C);
}

#[test]
fn draw_digit_via_bcd_and_font() {
    // V0 = 157; I = 0x300; BCD; read V0..V2; point at digit V1 (5); draw at (0,0)
    let mut emu = boot(&[0x609D, 0xA300, 0xF033, 0xF265, 0xF129, 0x6300, 0xD335]);
    emu.run(7, &NO_KEYS).unwrap();
    assert_eq!(emu.regs.get(0x0), 1);
    assert_eq!(emu.regs.get(0x1), 5);
    assert_eq!(emu.regs.get(0x2), 7);
    // "5" glyph: F0 80 F0 10 F0
    assert!(emu.fb.is_set(0, 0) && emu.fb.is_set(3, 0));
    assert!(emu.fb.is_set(0, 1) && !emu.fb.is_set(3, 1));
    assert!(!emu.fb.is_set(0, 3) && emu.fb.is_set(3, 3));
    assert_eq!(emu.regs.get(0xF), 0);
}

#[test]
fn wait_for_key_then_branch_on_it() {
    // V0 = K; skip if key V0 not pressed; V1 = 1; jump self
    let mut emu = boot(&[0xF00A, 0xE0A1, 0x6101, 0x1206]);
    emu.step(&NO_KEYS).unwrap();
    for _ in 0..10 {
        assert_eq!(emu.step(&NO_KEYS), Ok(Step::Waiting));
    }
    let mut seven = [false; 16];
    seven[7] = true;
    assert_eq!(emu.step(&seven), Ok(Step::KeyReceived(7)));
    // still held, so the skip does not happen
    emu.run(2, &seven).unwrap();
    assert_eq!(emu.regs.get(0x0), 7);
    assert_eq!(emu.regs.get(0x1), 1);
}

#[test]
fn random_is_reproducible_with_injected_source() {
    let mut emu = boot(&[0xC0FF, 0xC1FF, 0xC20F]);
    emu.run(3, &NO_KEYS).unwrap();
    assert_eq!(emu.regs.get(0x0), 0x5A);
    assert_eq!(emu.regs.get(0x1), 0x5B);
    assert_eq!(emu.regs.get(0x2), 0x0C);
}

#[test]
fn clear_screen_blanks_everything() {
    let mut emu = boot(&[0xD00F, 0x6020, 0xD00F, 0x00E0]);
    emu.run(3, &NO_KEYS).unwrap();
    assert!(!emu.fb.is_blank());
    emu.step(&NO_KEYS).unwrap();
    assert!(emu.fb.is_blank());
}

#[test]
fn oversized_rom_is_rejected() {
    let mut emu = Emulator::with_rng(StepRng::new(0, 0));
    let err = emu.load_rom(&vec![0u8; 4096 - 0x200 + 1]).unwrap_err();
    assert!(matches!(err, LoadError::RomTooLarge { .. }));
}
