#![allow(non_snake_case)]
#[allow(non_snake_case)]
pub mod HeatEquation;
#[allow(non_snake_case)]
pub mod ReactionDiffusion;
#[allow(non_snake_case)]
pub mod Utils;
#[allow(non_snake_case)]
pub mod WaveEquation;
pub mod cli;
pub mod settings;
pub mod simulation;
pub mod solver_error;
