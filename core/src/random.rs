// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::ops::RangeInclusive;

pub trait Random: Send + Sync {
    fn u64(&self, range: RangeInclusive<u64>) -> u64;
}

pub struct FastrandRandom;

impl Random for FastrandRandom {
    fn u64(&self, range: RangeInclusive<u64>) -> u64 {
        fastrand::u64(range)
    }
}
