mod jsonl;

pub use jsonl::{archive_war, ArchivedWar};
