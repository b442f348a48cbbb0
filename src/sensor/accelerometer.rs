// src/sensor/accelerometer.rs

//! I2C accelerometer backends.
//!
//! Both drivers are deliberately minimal: probe the identity register, put the
//! device in measurement mode at ±2 g, and read the three axes. The active
//! backend is chosen once at startup from `NodeConfig`.

use crate::common::{
    config::{AccelBackend, NodeConfig},
    error::NodeError,
    hal_traits::Accelerometer,
    reading::Acceleration3D,
};
use embedded_hal::i2c::I2c;
use log::{debug, error};

/// Standard gravity, m/s².
pub const STANDARD_GRAVITY: f32 = 9.80665;

// --- ADXL345 ---

const ADXL345_ADDR: u8 = 0x53;
const ADXL345_REG_DEVID: u8 = 0x00;
const ADXL345_REG_POWER_CTL: u8 = 0x2D;
const ADXL345_REG_DATA_FORMAT: u8 = 0x31;
const ADXL345_REG_DATAX0: u8 = 0x32;
const ADXL345_DEVID: u8 = 0xE5;
const ADXL345_MEASURE: u8 = 0x08;
const ADXL345_RANGE_2G: u8 = 0x00;
/// 4 mg per LSB at ±2 g, 10-bit.
const ADXL345_G_PER_LSB: f32 = 0.004;

/// Analog Devices ADXL345 over I2C.
#[derive(Debug)]
pub struct Adxl345<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Adxl345<I2C> {
    /// Driver at the default address (`SDO` low).
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, ADXL345_ADDR)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Adxl345 { i2c, address }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    fn read_register(&mut self, reg: u8) -> Result<u8, NodeError<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(NodeError::Io)?;
        Ok(buf[0])
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), NodeError<I2C::Error>> {
        self.i2c.write(self.address, &[reg, value]).map_err(NodeError::Io)
    }
}

impl<I2C: I2c> Accelerometer for Adxl345<I2C> {
    type Error = I2C::Error;

    fn init(&mut self) -> Result<(), NodeError<Self::Error>> {
        let id = self.read_register(ADXL345_REG_DEVID)?;
        if id != ADXL345_DEVID {
            error!("Failed to find ADXL345 chip (id {:#04x})", id);
            return Err(NodeError::SensorAbsent { expected: ADXL345_DEVID, found: id });
        }
        self.write_register(ADXL345_REG_DATA_FORMAT, ADXL345_RANGE_2G)?;
        self.write_register(ADXL345_REG_POWER_CTL, ADXL345_MEASURE)?;
        debug!("ADXL345 Found!");
        Ok(())
    }

    fn poll(&mut self) -> Result<Acceleration3D, NodeError<Self::Error>> {
        let mut raw = [0u8; 6];
        self.i2c
            .write_read(self.address, &[ADXL345_REG_DATAX0], &mut raw)
            .map_err(NodeError::Io)?;
        let scale = ADXL345_G_PER_LSB * STANDARD_GRAVITY;
        Ok(Acceleration3D {
            x: f32::from(i16::from_le_bytes([raw[0], raw[1]])) * scale,
            y: f32::from(i16::from_le_bytes([raw[2], raw[3]])) * scale,
            z: f32::from(i16::from_le_bytes([raw[4], raw[5]])) * scale,
        })
    }
}

// --- MPU-6050 ---

const MPU6050_ADDR: u8 = 0x68;
const MPU6050_REG_WHO_AM_I: u8 = 0x75;
const MPU6050_REG_PWR_MGMT_1: u8 = 0x6B;
const MPU6050_REG_ACCEL_CONFIG: u8 = 0x1C;
const MPU6050_REG_ACCEL_XOUT_H: u8 = 0x3B;
const MPU6050_WHO_AM_I: u8 = 0x68;
const MPU6050_WAKE: u8 = 0x00;
const MPU6050_RANGE_2G: u8 = 0x00;
const MPU6050_LSB_PER_G: f32 = 16_384.0;

/// InvenSense MPU-6050 over I2C. Only the accelerometer is used.
#[derive(Debug)]
pub struct Mpu6050<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Mpu6050<I2C> {
    /// Driver at the default address (`AD0` low).
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, MPU6050_ADDR)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Mpu6050 { i2c, address }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    fn read_register(&mut self, reg: u8) -> Result<u8, NodeError<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(NodeError::Io)?;
        Ok(buf[0])
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), NodeError<I2C::Error>> {
        self.i2c.write(self.address, &[reg, value]).map_err(NodeError::Io)
    }
}

impl<I2C: I2c> Accelerometer for Mpu6050<I2C> {
    type Error = I2C::Error;

    fn init(&mut self) -> Result<(), NodeError<Self::Error>> {
        let id = self.read_register(MPU6050_REG_WHO_AM_I)?;
        if id != MPU6050_WHO_AM_I {
            error!("Failed to find MPU6050 chip (id {:#04x})", id);
            return Err(NodeError::SensorAbsent { expected: MPU6050_WHO_AM_I, found: id });
        }
        self.write_register(MPU6050_REG_PWR_MGMT_1, MPU6050_WAKE)?;
        self.write_register(MPU6050_REG_ACCEL_CONFIG, MPU6050_RANGE_2G)?;
        debug!("MPU6050 Found!");
        Ok(())
    }

    fn poll(&mut self) -> Result<Acceleration3D, NodeError<Self::Error>> {
        let mut raw = [0u8; 6];
        self.i2c
            .write_read(self.address, &[MPU6050_REG_ACCEL_XOUT_H], &mut raw)
            .map_err(NodeError::Io)?;
        let scale = STANDARD_GRAVITY / MPU6050_LSB_PER_G;
        Ok(Acceleration3D {
            x: f32::from(i16::from_be_bytes([raw[0], raw[1]])) * scale,
            y: f32::from(i16::from_be_bytes([raw[2], raw[3]])) * scale,
            z: f32::from(i16::from_be_bytes([raw[4], raw[5]])) * scale,
        })
    }
}

// --- Backend selection ---

/// The accelerometer fitted to this node, chosen once from configuration.
#[derive(Debug)]
pub enum AnyAccelerometer<I2C> {
    Adxl345(Adxl345<I2C>),
    Mpu6050(Mpu6050<I2C>),
}

impl<I2C: I2c> AnyAccelerometer<I2C> {
    /// Wraps `i2c` in the driver named by `config.backend`.
    pub fn from_config(i2c: I2C, config: &NodeConfig) -> Self {
        match config.backend {
            AccelBackend::Adxl345 => AnyAccelerometer::Adxl345(Adxl345::new(i2c)),
            AccelBackend::Mpu6050 => AnyAccelerometer::Mpu6050(Mpu6050::new(i2c)),
        }
    }

    pub fn backend(&self) -> AccelBackend {
        match self {
            AnyAccelerometer::Adxl345(_) => AccelBackend::Adxl345,
            AnyAccelerometer::Mpu6050(_) => AccelBackend::Mpu6050,
        }
    }
}

impl<I2C: I2c> Accelerometer for AnyAccelerometer<I2C> {
    type Error = I2C::Error;

    fn init(&mut self) -> Result<(), NodeError<Self::Error>> {
        match self {
            AnyAccelerometer::Adxl345(dev) => dev.init(),
            AnyAccelerometer::Mpu6050(dev) => dev.init(),
        }
    }

    fn poll(&mut self) -> Result<Acceleration3D, NodeError<Self::Error>> {
        match self {
            AnyAccelerometer::Adxl345(dev) => dev.poll(),
            AnyAccelerometer::Mpu6050(dev) => dev.poll(),
        }
    }
}
