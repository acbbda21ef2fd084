//! Hardware-independent core library for thermo-sseg
//!
//! This crate contains all platform-agnostic logic for the temperature
//! display: the ADT7420 sensor driver and fixed-point decode, digit
//! formatting, 8-digit 7-segment layout, button mode decoding and the
//! poll loop that ties them together.
//!
//! It is `#![no_std]` so it compiles on both embedded targets and desktop
//! hosts (for the simulator and tests).

#![cfg_attr(not(test), no_std)]

pub mod buttons;
pub mod config;
pub mod display;
pub mod monitor;
pub mod sensors;
pub mod temperature;
