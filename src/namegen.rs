// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Random resource names for test workloads

use rand::{distributions::Uniform, Rng};

const SUFFIX_LENGTH: usize = 5;
const SUFFIX_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Append a dash and a short random lowercase suffix, e.g. `testdeployment-x7k2q`.
/// The result stays a valid DNS-1123 label as long as `base` is one.
pub fn append_random_string(base: &str) -> String {
    let mut rng = rand::thread_rng();
    let range = Uniform::from(0..SUFFIX_CHARS.len());
    let suffix: String = (0..SUFFIX_LENGTH)
        .map(|_| SUFFIX_CHARS[rng.sample(range)] as char)
        .collect();
    format!("{}-{}", base, suffix)
}
