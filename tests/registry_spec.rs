use oncall_rota::models::{Registry, RegistryError, Roster};
use speculate2::speculate;

speculate! {
    before {
        let mut registry = Registry::new(Roster::default());
    }

    describe "create_session" {
        it "assigns sequential 1-based ids" {
            assert_eq!(registry.create_session(), 1);
            assert_eq!(registry.create_session(), 2);
            assert_eq!(registry.create_session(), 3);
            let ids: Vec<u64> = registry.sessions().iter().map(|s| s.id).collect();
            assert_eq!(ids, [1, 2, 3]);
        }

        it "ends an unended active session before starting the next" {
            registry.create_session();
            registry.create_session();
            let first = &registry.sessions()[0];
            assert!(first.ended);
            assert!(first.ended_at.is_some());
            assert_eq!(registry.active_session().unwrap().id, 2);
        }

        it "does not re-end an already ended session" {
            registry.create_session();
            registry.active_session_mut().unwrap().end();
            let ended_at = registry.sessions()[0].ended_at;
            std::thread::sleep(std::time::Duration::from_millis(5));
            registry.create_session();
            assert_eq!(registry.sessions()[0].ended_at, ended_at);
        }

        it "keeps ended sessions around for audit" {
            registry.create_session();
            registry.create_session();
            registry.create_session();
            assert_eq!(registry.sessions().len(), 3);
        }
    }

    describe "active session" {
        it "reports NoActiveSession before the first session exists" {
            assert_eq!(
                registry.active_session().unwrap_err(),
                RegistryError::NoActiveSession
            );
            assert_eq!(
                registry.active_session_mut().unwrap_err(),
                RegistryError::NoActiveSession
            );
        }
    }

    describe "set_active" {
        it "switches only the pointer" {
            registry.create_session();
            registry.create_session();
            // session 1 ended when session 2 was created
            let before_flags: Vec<(bool, bool)> = registry
                .sessions()
                .iter()
                .map(|s| (s.ended, s.on_break))
                .collect();

            registry.set_active(1).expect("Failed to switch");
            assert_eq!(registry.active_session().unwrap().id, 1);

            let after_flags: Vec<(bool, bool)> = registry
                .sessions()
                .iter()
                .map(|s| (s.ended, s.on_break))
                .collect();
            assert_eq!(before_flags, after_flags);
        }

        it "rejects out-of-range ordinals and keeps the pointer" {
            registry.create_session();
            assert_eq!(
                registry.set_active(0).unwrap_err(),
                RegistryError::InvalidSessionReference(0)
            );
            assert_eq!(
                registry.set_active(2).unwrap_err(),
                RegistryError::InvalidSessionReference(2)
            );
            assert_eq!(registry.active_session().unwrap().id, 1);
        }

        it "allows navigating back to an ended session" {
            registry.create_session();
            registry.create_session();
            let session = registry.set_active(1).expect("Failed to switch");
            assert!(session.ended);
        }
    }

    describe "list" {
        it "yields sessions in creation order with the active marker" {
            registry.create_session();
            registry.create_session();
            registry.set_active(1).expect("Failed to switch");

            let listed: Vec<(u64, bool)> =
                registry.list().map(|(s, active)| (s.id, active)).collect();
            assert_eq!(listed, [(1, true), (2, false)]);
        }

        it "is restartable" {
            registry.create_session();
            assert_eq!(registry.list().count(), 1);
            assert_eq!(registry.list().count(), 1);
        }
    }

    describe "validate" {
        it "accepts a populated registry" {
            registry.create_session();
            let roster = registry.roster().clone();
            registry
                .active_session_mut()
                .unwrap()
                .assign_catalog(&roster, 7)
                .expect("Failed to assign");
            registry
                .active_session_mut()
                .unwrap()
                .start_break()
                .expect("Failed to start break");
            registry.validate().expect("Validation failed");
        }

        it "rejects on_break set with no open break" {
            registry.create_session();
            registry.active_session_mut().unwrap().on_break = true;
            assert!(registry.validate().is_err());
        }

        it "rejects an open break with on_break cleared" {
            registry.create_session();
            let session = registry.active_session_mut().unwrap();
            session.start_break().expect("Failed to start break");
            session.on_break = false;
            assert!(registry.validate().is_err());
        }
    }
}
