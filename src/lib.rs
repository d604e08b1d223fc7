// ==============================================================================
// lib.rs - Genomic Analysis Library
// ==============================================================================
// Description: Library interface for file analysis, QC and risk scoring
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

pub mod config;
pub mod genotype;
pub mod models;
pub mod output;
pub mod parsers;
pub mod processor;
pub mod quality_control;
pub mod risk;
pub mod stats;
pub mod validator;
