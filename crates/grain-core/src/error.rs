//! Error types for Grain arithmetic and allocation.
use thiserror::Error;

use crate::grain::Grain;
use crate::types::StrategyKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrainError {
    #[error("invalid number: {0}")] InvalidNumber(String),
    #[error("arithmetic overflow")] Overflow,
    #[error("parse: {0}")] Parse(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HarvestError {
    #[error("invalid harvest amount: {0}")] InvalidAmount(Grain),
    #[error("unsupported {kind} strategy version: {version}")] UnsupportedStrategyVersion { kind: StrategyKind, version: u32 },
    #[error("unknown strategy type: {0}")] UnknownStrategyType(String),
    #[error(transparent)] Grain(#[from] GrainError),
}
