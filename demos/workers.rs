//! A simple de-duplication example.
//!
//! In this example, several Worker threads process overlapping ranges of job
//! IDs, and use a shared `HashSet` to ensure that each job is only processed
//! once.
//!
//! Once a job is processed, it is also marked as done in the set of pending
//! jobs, which the Monitor thread watches until it empties.

extern crate coarse;
extern crate crossbeam_utils;

use std::{thread, time};

use coarse::hashset::HashSet;
use coarse::set::ConcurrentSet;

const NUMBER_WORKERS: u32 = 4;
const NUMBER_JOBS: u32 = 100;
const OVERLAP: u32 = 10;

const PACE_TIME: time::Duration = time::Duration::from_millis(1);

//  Claims the job, returning whether the caller should process it.
fn claim<S: ConcurrentSet<u32>>(claimed: &S, job: u32) -> bool {
    claimed.add(job)
}

fn main() {
    let claimed: HashSet<u32> = HashSet::new(1);
    let pending: HashSet<u32> = HashSet::new(16);

    pending.extend(0..NUMBER_WORKERS * NUMBER_JOBS);

    crossbeam_utils::thread::scope(|scope| {
        //
        //  Workers
        //
        for worker in 0..NUMBER_WORKERS {
            let claimed = &claimed;
            let pending = &pending;

            scope.spawn(move |_| {
                let first = (worker * NUMBER_JOBS).saturating_sub(OVERLAP);
                let last = (worker + 1) * NUMBER_JOBS;

                let mut processed = 0;

                for job in first..last {
                    if !claim(claimed, job) {
                        continue;
                    }

                    assert!(pending.remove(&job), "Job {} processed twice", job);
                    processed += 1;
                }

                println!("Worker {} - processed {} jobs", worker, processed);
            });
        }

        //
        //  Monitor
        //
        scope.spawn(|_| {
            while !pending.is_empty() {
                println!("Monitor - {} jobs pending", pending.len());
                thread::sleep(PACE_TIME);
            }
        });
    })
    .unwrap();

    println!(
        "Done - {} jobs claimed, in {} buckets",
        claimed.len(),
        claimed.number_buckets()
    );

    assert_eq!((NUMBER_WORKERS * NUMBER_JOBS) as usize, claimed.len());
}
