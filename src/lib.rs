// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
//! Sonification engine for still images.
//!
//! A pointer hovering over an image is turned into a set of playing instrument
//! voices and per-layer haptic feedback. The pipeline for every pointer move is:
//! - scan the cursor neighborhood across every sounding layer ([`sonify`])
//! - flag object edges and attach a stereo pan value
//! - reconcile the playing voices against the new candidates ([`voice`])
//! - start or stop each layer's haptic actuator ([`haptic`])
//!
//! [`engine::Engine`] owns the per-image state and [`session::Session`] serializes
//! events for one engine on a tokio task.

pub mod actuator;
pub mod config;
pub mod engine;
pub mod haptic;
pub mod image;
pub mod session;
pub mod sonify;
pub mod voice;

#[cfg(test)]
mod test;
#[cfg(test)]
mod testutil;
