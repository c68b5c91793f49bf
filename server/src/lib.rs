//! Kiddo server: chores, points, wishes and rewards for a family.

pub mod backend;
