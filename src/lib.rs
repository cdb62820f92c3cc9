//! Code Duel - timed learner-versus-AI coding competitions.
//!
//! After finishing a course a learner answers the course's questions one at
//! a time against an AI opponent. Each question runs on a fixed timer, the
//! opponent's answer is produced when the question opens, and the finished
//! competition is scored by an AI evaluator.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
