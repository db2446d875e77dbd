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
/// Maps the pointer's horizontal position on the rendered image onto the
/// `[-1, 1]` scale used by the voice panners. A zero or invalid width pans to
/// the center.
pub fn pan_ratio(pointer_x: f64, rendered_width: f64) -> f32 {
    if !rendered_width.is_finite() || rendered_width <= 0.0 || !pointer_x.is_finite() {
        return 0.0;
    }
    let ratio = pointer_x / rendered_width;
    (ratio * 2.0 - 1.0).clamp(-1.0, 1.0) as f32
}
