use appforge::models::{ChatMessage, ChatRole, FileMap};
use appforge::store::{MemoryStore, ProjectStore, StoreError};
use speculate2::speculate;

fn one_file(content: &str) -> FileMap {
    let mut files = FileMap::new();
    files.insert("/App.js".to_string(), content.to_string());
    files
}

speculate! {
    before {
        let store = MemoryStore::new();
    }

    describe "store" {
        it "creates a project at version 1" {
            store.store("p1", one_file("v1"));

            let (files, version) = store.snapshot("p1").expect("not stored");
            assert_eq!(version, 1);
            assert_eq!(files["/App.js"], "v1");
        }

        it "resets to version 1 when storing over an existing project" {
            store.store("p1", one_file("first"));
            store.commit_modification("p1", one_file("second")).expect("commit failed");
            assert_eq!(store.snapshot("p1").unwrap().1, 2);

            store.store("p1", one_file("reseeded"));

            let (files, version) = store.snapshot("p1").expect("not stored");
            assert_eq!(version, 1);
            assert_eq!(files["/App.js"], "reseeded");
        }

        it "keeps the existing chat ledger when overwriting" {
            store.store("p1", one_file("first"));
            store.append_message("p1", ChatMessage::user("make it blue"));

            store.store("p1", one_file("reseeded"));

            let history = store.history("p1");
            assert_eq!(history.len(), 1);
            assert_eq!(history[0].content, "make it blue");
        }
    }

    describe "get" {
        it "returns None for an unknown id" {
            assert!(store.get("missing").is_none());
        }

        it "returns the current file mapping" {
            store.store("p1", one_file("v1"));
            assert_eq!(store.get("p1").unwrap()["/App.js"], "v1");
        }
    }

    describe "commit_modification" {
        it "bumps the version once per commit" {
            store.store("p1", one_file("v1"));

            let v2 = store.commit_modification("p1", one_file("v2")).expect("commit failed");
            let v3 = store.commit_modification("p1", one_file("v3")).expect("commit failed");

            assert_eq!(v2, 2);
            assert_eq!(v3, 3);
            let (files, version) = store.snapshot("p1").unwrap();
            assert_eq!(version, 3);
            assert_eq!(files["/App.js"], "v3");
        }

        it "fails for an unknown id without creating it" {
            let result = store.commit_modification("missing", one_file("x"));

            assert_eq!(result.unwrap_err(), StoreError::ProjectNotFound);
            assert!(store.get("missing").is_none());
        }
    }

    describe "chat ledger" {
        it "is empty for an unknown id and does not create one by reading" {
            assert!(store.history("missing").is_empty());
            assert!(store.get("missing").is_none());
        }

        it "preserves insertion order" {
            store.store("p1", one_file("v1"));
            store.append_message("p1", ChatMessage::user("first"));
            store.append_message("p1", ChatMessage::assistant("second"));
            store.append_message("p1", ChatMessage::user("third"));

            let history = store.history("p1");
            assert_eq!(history.len(), 3);
            assert_eq!(history[0].content, "first");
            assert_eq!(history[0].role, ChatRole::User);
            assert_eq!(history[1].content, "second");
            assert_eq!(history[1].role, ChatRole::Assistant);
            assert_eq!(history[2].content, "third");
        }

        it "appends lazily for ids that were never stored" {
            store.append_message("orphan", ChatMessage::user("hello"));
            assert_eq!(store.history("orphan").len(), 1);
        }
    }
}
