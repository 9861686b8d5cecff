// Application layer: the two workflows wired onto the sync engine.

pub mod pipelines;
