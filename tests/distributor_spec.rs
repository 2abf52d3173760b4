use oncall_rota::models::{Distributor, Roster};
use speculate2::speculate;

fn roster6() -> Roster {
    Roster::new(
        ["A", "B", "C", "D", "E", "F"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    )
    .expect("Failed to build roster")
}

fn share_count(shares: &[oncall_rota::models::AssignedShare], person: &str) -> u64 {
    shares
        .iter()
        .find(|s| s.person == person)
        .map(|s| s.count)
        .unwrap_or(0)
}

speculate! {
    describe "assign" {
        before {
            let roster = roster6();
            let mut distributor = Distributor::new(roster.len());
        }

        it "hands out exactly n units in total" {
            for n in [0u64, 1, 5, 6, 7, 13, 600] {
                let shares = distributor.assign(&roster, n);
                let handed_out: u64 = shares.iter().map(|s| s.count).sum();
                assert_eq!(handed_out, n);
            }
        }

        it "gives everyone an equal share on exact multiples and leaves the cursor alone" {
            let shares = distributor.assign(&roster, 12);
            assert_eq!(shares.len(), 6);
            for share in &shares {
                assert_eq!(share.count, 2);
            }
            assert_eq!(distributor.cursor(), None);
            assert!(distributor.counts().iter().all(|&c| c == 2));
        }

        it "routes the remainder cyclically starting at the head" {
            // base=1 for all six, one remainder unit to A
            let shares = distributor.assign(&roster, 7);
            assert_eq!(share_count(&shares, "A"), 2);
            for person in ["B", "C", "D", "E", "F"] {
                assert_eq!(share_count(&shares, person), 1);
            }
            assert_eq!(distributor.cursor(), Some(0));
            assert_eq!(distributor.last_assignee(&roster), Some("A"));
        }

        it "carries the cursor across calls" {
            distributor.assign(&roster, 2); // remainder units to A, B
            let shares = distributor.assign(&roster, 2); // should go to C, D
            assert_eq!(share_count(&shares, "C"), 1);
            assert_eq!(share_count(&shares, "D"), 1);
            assert_eq!(share_count(&shares, "A"), 0);
            assert_eq!(distributor.last_assignee(&roster), Some("D"));
        }

        it "wraps the cursor around the roster" {
            distributor.assign(&roster, 5); // A..E
            let shares = distributor.assign(&roster, 2); // F, then back to A
            assert_eq!(share_count(&shares, "F"), 1);
            assert_eq!(share_count(&shares, "A"), 1);
            assert_eq!(distributor.cursor(), Some(0));
        }

        it "accumulates total across calls" {
            distributor.assign(&roster, 3);
            distributor.assign(&roster, 0);
            distributor.assign(&roster, 10);
            assert_eq!(distributor.total(), 13);
            assert_eq!(distributor.counts().iter().sum::<u64>(), 13);
        }

        it "treats zero as a no-op" {
            let before = distributor.clone();
            let shares = distributor.assign(&roster, 0);
            assert!(shares.is_empty());
            assert_eq!(distributor, before);
        }

        it "orders shares by first unit received" {
            distributor.assign(&roster, 3); // cursor now at C
            // next batch: base for everyone, remainder starts at D
            let shares = distributor.assign(&roster, 8);
            let order: Vec<&str> = shares.iter().map(|s| s.person.as_str()).collect();
            assert_eq!(order, ["A", "B", "C", "D", "E", "F"]);
            assert_eq!(share_count(&shares, "D"), 2);
            assert_eq!(share_count(&shares, "E"), 2);
        }

    }

    describe "single person roster" {
        it "gives every unit to the only member" {
            let solo = Roster::new(vec!["Solo".to_string()]).expect("Failed to build roster");
            let mut distributor = Distributor::new(solo.len());
            let shares = distributor.assign(&solo, 4);
            assert_eq!(shares.len(), 1);
            assert_eq!(shares[0].count, 4);
            assert_eq!(distributor.total(), 4);
        }
    }

    describe "is_consistent" {
        before {
            let roster = roster6();
            let mut distributor = Distributor::new(roster.len());
        }

        it "accepts a freshly used distributor" {
            distributor.assign(&roster, 9);
            assert!(distributor.is_consistent(roster.len()));
        }

        it "rejects a roster length mismatch" {
            distributor.assign(&roster, 9);
            assert!(!distributor.is_consistent(4));
        }
    }
}
