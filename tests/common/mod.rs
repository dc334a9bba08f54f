//! Behavioural model of the AT86RF215 and fake board peripherals.
//!
//! The chip model answers SPI transactions from a flat register memory, latches
//! interrupt causes in response to strobes and raises the shared IRQ line, which is
//! enough to run the radio controller's blocking commands to completion.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use at86rf215::{
    BasebandIrq, Config, InterruptLine, Radio, RadioIrq, RadioTimer, Ticks, TimerCallback,
};
use embedded_hal::spi::{ErrorType, Operation, SpiDevice};

pub const RF_RST: u16 = 0x0005;
pub const RF_PN: u16 = 0x000D;
pub const RF_VN: u16 = 0x000E;
pub const RF09_STATE: u16 = 0x0102;
pub const RF09_CMD: u16 = 0x0103;
pub const RF09_CS: u16 = 0x0104;
pub const RF09_CCF0L: u16 = 0x0105;
pub const RF09_CCF0H: u16 = 0x0106;
pub const RF09_CNL: u16 = 0x0107;
pub const RF09_CNM: u16 = 0x0108;
pub const RF09_EDV: u16 = 0x0110;
pub const BBC0_PC: u16 = 0x0301;
pub const BBC0_RXFLL: u16 = 0x0304;
pub const BBC0_TXFLL: u16 = 0x0306;
pub const BBC0_FBRXS: u16 = 0x2000;
pub const BBC0_FBTXS: u16 = 0x2800;

pub const CMD_TRXOFF: u8 = 0x02;
pub const CMD_TXPREP: u8 = 0x03;
pub const CMD_TX: u8 = 0x04;
pub const CMD_RX: u8 = 0x05;

const MEMORY_SIZE: usize = 0x3000;
const IRQS_BLOCK: usize = 4;

pub struct ChipState {
    memory: Vec<u8>,
    irqs: [u8; IRQS_BLOCK],
    /// Every write access as (start address, data)
    pub writes: Vec<(u16, Vec<u8>)>,
    /// Start address of every read access
    pub reads: Vec<u16>,
    /// Every byte written to RF09_CMD
    pub strobes: Vec<u8>,
    /// Latch TRXRDY on TXPREP and TXFE on TX
    pub responsive: bool,
    /// Level of the IRQ line edge detector
    pub line_pending: bool,
    pub line_enabled: bool,
}

impl ChipState {
    fn latch(&mut self, rf09: RadioIrq, bbc0: BasebandIrq) {
        self.irqs[0] |= rf09.bits();
        self.irqs[2] |= bbc0.bits();
        self.line_pending = true;
    }

    fn write(&mut self, address: u16, data: &[u8]) {
        self.writes.push((address, data.to_vec()));
        let start = usize::from(address);
        self.memory[start..start + data.len()].copy_from_slice(data);

        if address == RF09_CMD {
            let command = data[0];
            self.strobes.push(command);
            if self.responsive {
                match command {
                    CMD_TXPREP => self.latch(RadioIrq::TRXRDY, BasebandIrq::empty()),
                    CMD_TX => self.latch(RadioIrq::empty(), BasebandIrq::TXFE),
                    _ => {}
                }
            }
        }
    }

    fn read(&mut self, address: u16, buffer: &mut [u8]) {
        self.reads.push(address);
        for (offset, byte) in buffer.iter_mut().enumerate() {
            let at = usize::from(address) + offset;
            *byte = if at < IRQS_BLOCK {
                core::mem::take(&mut self.irqs[at])
            } else {
                self.memory[at]
            };
        }
    }
}

/// AT86RF215 behavioural model, cloned handles share the same chip
#[derive(Clone)]
pub struct Chip {
    state: Rc<RefCell<ChipState>>,
}

impl Chip {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ChipState {
                memory: vec![0; MEMORY_SIZE],
                irqs: [0; IRQS_BLOCK],
                writes: Vec::new(),
                reads: Vec::new(),
                strobes: Vec::new(),
                responsive: true,
                line_pending: false,
                line_enabled: false,
            })),
        }
    }

    pub fn state(&self) -> std::cell::RefMut<'_, ChipState> {
        self.state.borrow_mut()
    }

    pub fn line(&self) -> Line {
        Line {
            chip: self.clone(),
        }
    }

    /// Latches interrupt causes and raises the IRQ line
    pub fn raise(&self, rf09: RadioIrq, bbc0: BasebandIrq) {
        self.state().latch(rf09, bbc0);
    }

    /// Places a received frame in the receive frame buffer
    pub fn inject_frame(&self, frame: &[u8], fcs_ok: bool, energy_dbm: i8) {
        let mut state = self.state();
        let rx = usize::from(BBC0_FBRXS);
        state.memory[rx..rx + frame.len()].copy_from_slice(frame);

        let len = (frame.len() as u16).to_le_bytes();
        let rxfl = usize::from(BBC0_RXFLL);
        state.memory[rxfl..rxfl + 2].copy_from_slice(&len);

        let pc = usize::from(BBC0_PC);
        state.memory[pc] = if fcs_ok { 0x3E } else { 0x1E };
        state.memory[usize::from(RF09_EDV)] = energy_dbm as u8;
    }

    pub fn poke(&self, address: u16, value: u8) {
        self.state().memory[usize::from(address)] = value;
    }

    pub fn peek(&self, address: u16, len: usize) -> Vec<u8> {
        let start = usize::from(address);
        self.state().memory[start..start + len].to_vec()
    }

    /// Last value written to a single register, if any
    pub fn last_write(&self, address: u16) -> Option<u8> {
        self.state()
            .writes
            .iter()
            .rev()
            .find(|(at, _)| *at == address)
            .map(|(_, data)| data[0])
    }

    pub fn was_written(&self, address: u16) -> bool {
        self.last_write(address).is_some()
    }

    pub fn clear_log(&self) {
        let mut state = self.state();
        state.writes.clear();
        state.reads.clear();
        state.strobes.clear();
    }
}

impl ErrorType for Chip {
    type Error = Infallible;
}

impl SpiDevice for Chip {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        let (first, rest) = operations
            .split_first_mut()
            .expect("empty SPI transaction");

        let header = match first {
            Operation::Write(header) => u16::from_be_bytes([header[0], header[1]]),
            _ => panic!("SPI transaction must start with a command header"),
        };
        let is_write = header & 0x8000 != 0;
        let mut address = header & 0x3FFF;

        for operation in rest {
            match operation {
                Operation::Write(data) => {
                    assert!(is_write, "data written during a read access");
                    state.write(address, &data[..]);
                    address += data.len() as u16;
                }
                Operation::Read(buffer) => {
                    assert!(!is_write, "data read during a write access");
                    state.read(address, &mut buffer[..]);
                    address += buffer.len() as u16;
                }
                _ => panic!("unsupported SPI operation"),
            }
        }
        Ok(())
    }
}

/// IRQ line wired to the chip model
pub struct Line {
    chip: Chip,
}

impl InterruptLine for Line {
    fn enable_rising_edge(&mut self) {
        let mut state = self.chip.state();
        state.line_pending = false;
        state.line_enabled = true;
    }

    fn is_pending(&mut self) -> bool {
        self.chip.state().line_pending
    }

    fn clear_pending(&mut self) {
        self.chip.state().line_pending = false;
    }
}

#[derive(Default)]
pub struct TimerState {
    pub running: bool,
    pub period: Ticks,
    pub value: Ticks,
    pub captured: Ticks,
    pub overflow: Option<TimerCallback>,
    pub compare: Option<TimerCallback>,
}

#[derive(Clone, Default)]
pub struct Timer {
    pub state: Rc<RefCell<TimerState>>,
}

impl Timer {
    pub fn capture(&self, ticks: Ticks) {
        self.state.borrow_mut().captured = ticks;
    }
}

impl RadioTimer for Timer {
    fn start(&mut self, period: Ticks) {
        let mut state = self.state.borrow_mut();
        state.running = true;
        state.period = period;
        state.value = 0;
    }

    fn value(&mut self) -> Ticks {
        self.state.borrow().value
    }

    fn set_period(&mut self, period: Ticks) {
        self.state.borrow_mut().period = period;
    }

    fn period(&mut self) -> Ticks {
        self.state.borrow().period
    }

    fn set_overflow_callback(&mut self, callback: TimerCallback) {
        self.state.borrow_mut().overflow = Some(callback);
    }

    fn set_compare_callback(&mut self, callback: TimerCallback) {
        self.state.borrow_mut().compare = Some(callback);
    }

    fn captured_time(&mut self) -> Ticks {
        self.state.borrow().captured
    }
}

/// Output pin remembering its level
#[derive(Clone, Default)]
pub struct Pin {
    pub high: Rc<Cell<bool>>,
}

impl Pin {
    pub fn is_high(&self) -> bool {
        self.high.get()
    }
}

impl embedded_hal::digital::ErrorType for Pin {
    type Error = Infallible;
}

impl embedded_hal::digital::OutputPin for Pin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high.set(true);
        Ok(())
    }
}

pub type TestRadio = Radio<Chip, Timer, Line, Pin, Pin>;

pub struct Board {
    pub chip: Chip,
    pub timer: Timer,
    pub debug_pin: Pin,
    pub led: Pin,
}

/// Builds a controller wired to a fresh chip model
pub fn board(config: Config) -> (TestRadio, Board) {
    let board = Board {
        chip: Chip::new(),
        timer: Timer::default(),
        debug_pin: Pin::default(),
        led: Pin::default(),
    };
    let radio = Radio::new(
        board.chip.clone(),
        board.timer.clone(),
        board.chip.line(),
        board.debug_pin.clone(),
        board.led.clone(),
        config,
    );
    (radio, board)
}

/// Builds a controller and runs `init`
pub fn initialized_board() -> (TestRadio, Board) {
    let (mut radio, board) = board(Config::default());
    radio.init().unwrap();
    board.chip.clear_log();
    (radio, board)
}
