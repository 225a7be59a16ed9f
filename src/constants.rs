// START_BYTE marks the beginning of every frame, in both directions.
pub const START_BYTE: u8 = 0xFF;

// SENSOR_ADDRESS is the fixed address of the single sensor on the bus.
pub const SENSOR_ADDRESS: u8 = 0x01;

// FRAME_LEN is the size of every command and response frame.
pub const FRAME_LEN: usize = 9;

// MIN_READ_RESPONSE_LEN is the shortest read reply that still carries a concentration.
pub const MIN_READ_RESPONSE_LEN: usize = 4;

// Command codes, byte 2 of a command frame. A read reply echoes CMD_READ_CO2 in byte 1.
pub const CMD_READ_CO2: u8 = 0x86;
pub const CMD_ZERO_POINT_CALIBRATION: u8 = 0x87;
pub const CMD_SPAN_POINT_CALIBRATION: u8 = 0x88;
pub const CMD_ABC: u8 = 0x79;
pub const CMD_DETECTION_RANGE: u8 = 0x99;

// First payload byte of an ABC command.
pub const ABC_ON: u8 = 0xA0;
pub const ABC_OFF: u8 = 0x00;

// Serial line settings expected by the sensor (8 data bits, no parity, 1 stop bit).
pub const BAUD_RATE: u32 = 9600;
pub const READ_TIMEOUT_MS: u64 = 1000;
