use chip8vm::{Config, DISPLAY_WIDTH, Machine, StepOutcome, VmError};
use proptest::prelude::*;

fn assemble(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_be_bytes()).collect()
}

fn boot(words: &[u16]) -> Machine {
    let mut vm = Machine::new(Config::seeded(0xC8));
    vm.load(&assemble(words)).unwrap();
    vm
}

fn run(vm: &mut Machine, steps: usize) {
    for _ in 0..steps {
        vm.step().unwrap();
    }
}

#[test]
fn add_sets_carry_only_past_255() {
    let mut vm = boot(&[0x60FA, 0x610A, 0x8014]);
    run(&mut vm, 3);
    assert_eq!(vm.registers().v[0], 4);
    assert_eq!(vm.registers().v[0xF], 1);

    let mut vm = boot(&[0x6001, 0x6101, 0x8014]);
    run(&mut vm, 3);
    assert_eq!(vm.registers().v[0], 2);
    assert_eq!(vm.registers().v[0xF], 0);
}

#[test]
fn subtract_flag_means_no_borrow() {
    let mut vm = boot(&[0x6005, 0x610A, 0x8015]);
    run(&mut vm, 3);
    assert_eq!(vm.registers().v[0], 251);
    assert_eq!(vm.registers().v[0xF], 0);

    let mut vm = boot(&[0x600A, 0x6105, 0x8015]);
    run(&mut vm, 3);
    assert_eq!(vm.registers().v[0], 5);
    assert_eq!(vm.registers().v[0xF], 1);

    // SUBN: Vy - Vx
    let mut vm = boot(&[0x6005, 0x610A, 0x8017]);
    run(&mut vm, 3);
    assert_eq!(vm.registers().v[0], 5);
    assert_eq!(vm.registers().v[0xF], 1);
}

#[test]
fn equal_operands_do_not_borrow() {
    let mut vm = boot(&[0x6007, 0x6107, 0x8015]);
    run(&mut vm, 3);
    assert_eq!(vm.registers().v[0], 0);
    assert_eq!(vm.registers().v[0xF], 1);
}

#[test]
fn shifts_report_bit_shifted_out() {
    let mut vm = boot(&[0x6003, 0x8006]);
    run(&mut vm, 2);
    assert_eq!(vm.registers().v[0], 0b0000_0001);
    assert_eq!(vm.registers().v[0xF], 1);

    let mut vm = boot(&[0x6081, 0x800E]);
    run(&mut vm, 2);
    assert_eq!(vm.registers().v[0], 0b0000_0010);
    assert_eq!(vm.registers().v[0xF], 1);
}

#[test]
fn drawing_twice_erases_and_collides() {
    // I = 0x300, which holds 0xFF; draw 8x1 at (0, 0) twice.
    let mut vm = boot(&[0xA300, 0x6000, 0xD001, 0xD001]);
    vm.load_at(&[0xFF], 0x300).unwrap();
    run(&mut vm, 3);
    assert_eq!(vm.framebuffer().row(0)[0], 0xFF);
    assert_eq!(vm.registers().v[0xF], 0);

    run(&mut vm, 1);
    assert_eq!(vm.framebuffer().lit_count(), 0);
    assert_eq!(vm.registers().v[0xF], 1);
}

#[test]
fn sprite_wraps_horizontally_on_same_row() {
    let mut vm = boot(&[0xA300, 0x603C, 0x6105, 0xD011]);
    vm.load_at(&[0xFF], 0x300).unwrap();
    run(&mut vm, 4);
    let fb = vm.framebuffer();
    for x in 60..DISPLAY_WIDTH {
        assert!(fb.pixel(x, 5));
    }
    for x in 0..4 {
        assert!(fb.pixel(x, 5));
    }
    assert!(!fb.pixel(4, 5));
    assert_eq!(fb.lit_count(), 8);
}

#[test]
fn sprite_wraps_vertically() {
    let mut vm = boot(&[0xA300, 0x6000, 0x611F, 0xD012]);
    vm.load_at(&[0x80, 0x80], 0x300).unwrap();
    run(&mut vm, 4);
    let fb = vm.framebuffer();
    assert!(fb.pixel(0, 31));
    assert!(fb.pixel(0, 0));
}

#[test]
fn draw_reading_past_memory_fails() {
    let mut vm = boot(&[0xAFFE, 0xD005]);
    run(&mut vm, 1);
    assert_eq!(
        vm.step(),
        Err(VmError::AddressOutOfRange { address: 0x1000 })
    );
}

#[test]
fn call_depth_is_bounded() {
    // Every call targets the next word, so nesting grows by one per step.
    let calls: Vec<u16> = (0..17).map(|i| 0x2202 + 2 * i).collect();
    let mut vm = boot(&calls);
    run(&mut vm, 16);
    assert_eq!(vm.registers().sp, 16);
    assert_eq!(vm.step(), Err(VmError::StackOverflow { capacity: 16 }));
}

#[test]
fn returns_unwind_then_underflow() {
    // 0x200: 16 calls into the next word; 0x220 onwards: return forever.
    let mut words: Vec<u16> = (0..16).map(|i| 0x2202 + 2 * i).collect();
    words.push(0x00EE);
    let mut vm = boot(&words);
    run(&mut vm, 16);
    assert_eq!(vm.registers().pc, 0x220);

    for depth in (0..16).rev() {
        vm.step().unwrap();
        assert_eq!(vm.registers().sp, depth);
        // Jump back to the return.
        vm.load_at(&assemble(&[0x00EE]), usize::from(vm.registers().pc))
            .unwrap();
    }
    assert_eq!(vm.step(), Err(VmError::StackUnderflow));
}

#[test]
fn stepping_never_touches_timers() {
    let mut words = vec![0x6033, 0xF015, 0xF018];
    words.extend(std::iter::repeat_n(0x7001, 100));
    let mut vm = boot(&words);
    run(&mut vm, 103);
    assert_eq!(vm.registers().delay, 0x33);
    assert_eq!(vm.registers().sound, 0x33);
}

#[test]
fn ticks_count_down_to_zero() {
    let mut vm = boot(&[0x600A, 0xF015, 0xF018]);
    run(&mut vm, 3);
    for _ in 0..4 {
        vm.tick_timers();
    }
    assert_eq!(vm.registers().delay, 6);
    for _ in 0..20 {
        vm.tick_timers();
    }
    assert_eq!(vm.registers().delay, 0);
    assert_eq!(vm.registers().sound, 0);
}

#[test]
fn skip_on_immediate_compare() {
    let mut vm = boot(&[0x6042, 0x3042]);
    run(&mut vm, 2);
    assert_eq!(vm.registers().pc, 0x206);

    let mut vm = boot(&[0x6041, 0x3042]);
    run(&mut vm, 2);
    assert_eq!(vm.registers().pc, 0x204);
}

#[test]
fn skip_on_immediate_mismatch() {
    let mut vm = boot(&[0x6041, 0x4042]);
    run(&mut vm, 2);
    assert_eq!(vm.registers().pc, 0x206);

    let mut vm = boot(&[0x6042, 0x4042]);
    run(&mut vm, 2);
    assert_eq!(vm.registers().pc, 0x204);
}

#[test]
fn skip_on_register_compare() {
    // Equal registers: 5xy0 skips, 9xy0 falls through.
    let mut vm = boot(&[0x6007, 0x6107, 0x5010]);
    run(&mut vm, 3);
    assert_eq!(vm.registers().pc, 0x208);
    let mut vm = boot(&[0x6007, 0x6107, 0x9010]);
    run(&mut vm, 3);
    assert_eq!(vm.registers().pc, 0x206);

    // Different registers: 9xy0 skips, 5xy0 falls through.
    let mut vm = boot(&[0x6007, 0x6108, 0x9010]);
    run(&mut vm, 3);
    assert_eq!(vm.registers().pc, 0x208);
    let mut vm = boot(&[0x6007, 0x6108, 0x5010]);
    run(&mut vm, 3);
    assert_eq!(vm.registers().pc, 0x206);
}

#[test]
fn register_copy() {
    let mut vm = boot(&[0x6011, 0x6199, 0x8010]);
    run(&mut vm, 3);
    assert_eq!(vm.registers().v[0], 0x99);
    assert_eq!(vm.registers().v[1], 0x99);
}

#[test]
fn clear_screen_after_draw() {
    let mut vm = boot(&[0xA300, 0x6000, 0xD002, 0x00E0]);
    vm.load_at(&[0xFF, 0x81], 0x300).unwrap();
    run(&mut vm, 3);
    assert_eq!(vm.framebuffer().lit_count(), 10);
    run(&mut vm, 1);
    assert_eq!(vm.framebuffer().lit_count(), 0);
    assert_eq!(vm.registers().pc, 0x208);
}

#[test]
fn jump_sets_pc() {
    let mut vm = boot(&[0x1ABC]);
    run(&mut vm, 1);
    assert_eq!(vm.registers().pc, 0xABC);
}

#[test]
fn jump_with_offset_to_odd_address_fetches_there() {
    // V0 = 1; B204 lands on 0x205, where 6A42 starts.
    let mut vm = Machine::new(Config::seeded(0xC8));
    vm.load(&[0x60, 0x01, 0xB2, 0x04, 0x00, 0x6A, 0x42]).unwrap();
    run(&mut vm, 2);
    assert_eq!(vm.registers().pc, 0x205);
    run(&mut vm, 1);
    assert_eq!(vm.registers().v[0xA], 0x42);
    assert_eq!(vm.registers().pc, 0x207);
}

#[test]
fn register_dump_past_end_writes_nothing() {
    // V0..V2 = 1, 2, 3; I = 0xFFE; dump three bytes.
    let mut vm = boot(&[0x6001, 0x6102, 0x6203, 0xAFFE, 0xF255]);
    run(&mut vm, 4);
    assert_eq!(
        vm.step(),
        Err(VmError::AddressOutOfRange { address: 0x1000 })
    );
    assert_eq!(vm.memory().read_byte(0xFFE), Ok(0));
    assert_eq!(vm.memory().read_byte(0xFFF), Ok(0));
}

#[test]
fn register_load_past_end_keeps_registers() {
    let mut vm = boot(&[0x6001, 0x6102, 0x6203, 0xAFFE, 0xF265]);
    run(&mut vm, 4);
    assert_eq!(
        vm.step(),
        Err(VmError::AddressOutOfRange { address: 0x1000 })
    );
    assert_eq!(vm.registers().v[..3], [1, 2, 3]);
}

#[test]
fn key_wait_suspends_until_press() {
    let mut vm = boot(&[0xF20A, 0x1202]);
    run(&mut vm, 1);
    for _ in 0..10 {
        assert_eq!(vm.step(), Ok(StepOutcome::WaitingForKey));
    }
    assert_eq!(vm.registers().pc, 0x202);
    vm.set_key(0xE, true).unwrap();
    vm.step().unwrap();
    assert_eq!(vm.registers().v[2], 0xE);
    assert!(!vm.is_waiting_for_key());
}

#[test]
fn oversized_program_is_rejected() {
    let mut vm = Machine::new(Config::default());
    assert_eq!(
        vm.load(&vec![0; 0xE01]),
        Err(VmError::ProgramTooLarge {
            size: 0xE01,
            max: 0xE00
        })
    );
}

#[test]
fn same_seed_same_random_stream() {
    let program = [0xC0FF, 0xC1FF, 0xC2FF, 0xC3FF];
    let mut a = boot(&program);
    let mut b = boot(&program);
    run(&mut a, 4);
    run(&mut b, 4);
    assert_eq!(a.registers().v, b.registers().v);
}

proptest! {
    #[test]
    fn add_flag_matches_widened_sum(x in any::<u8>(), y in any::<u8>()) {
        let mut vm = boot(&[0x6000 | u16::from(x), 0x6100 | u16::from(y), 0x8014]);
        run(&mut vm, 3);
        let regs = vm.registers();
        prop_assert_eq!(regs.v[0], x.wrapping_add(y));
        prop_assert_eq!(regs.v[0xF] == 1, u16::from(x) + u16::from(y) > 255);
    }

    #[test]
    fn sub_flags_match_unsigned_compare(x in any::<u8>(), y in any::<u8>()) {
        let mut vm = boot(&[0x6000 | u16::from(x), 0x6100 | u16::from(y), 0x8015]);
        run(&mut vm, 3);
        prop_assert_eq!(vm.registers().v[0], x.wrapping_sub(y));
        prop_assert_eq!(vm.registers().v[0xF] == 1, x >= y);

        let mut vm = boot(&[0x6000 | u16::from(x), 0x6100 | u16::from(y), 0x8017]);
        run(&mut vm, 3);
        prop_assert_eq!(vm.registers().v[0], y.wrapping_sub(x));
        prop_assert_eq!(vm.registers().v[0xF] == 1, y >= x);
    }
}
