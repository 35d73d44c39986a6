//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in burstfire-core:
//!
//! - Triac/SSR output banks driven from `embedded-hal` output pins

#![no_std]
#![deny(unsafe_code)]

pub mod output;
