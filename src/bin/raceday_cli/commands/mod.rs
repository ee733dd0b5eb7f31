// ABOUTME: Re-exports command modules for raceday-cli
// ABOUTME: Provides the score, best and summary subcommands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Raceday Planner Contributors

pub mod best;
pub mod score;
pub mod summary;
