//! # Ports Layer
//!
//! - **Inbound (Driving)**: API that the admission validator calls

pub mod inbound;
