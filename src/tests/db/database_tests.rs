    use super::*;

    use serde_json::json;

    fn row(v: Value) -> Row {
        v.as_object().cloned().expect("object")
    }

    fn item_row(id: &str, name: &str, created_at: &str) -> Row {
        row(json!({
            "id": id,
            "name": name,
            "category": "Geral",
            "unit": "unidade",
            "created_at": created_at,
        }))
    }

    fn list_row(id: &str, name: &str) -> Row {
        row(json!({ "id": id, "name": name, "created_at": "2024-01-01T00:00:00Z" }))
    }

    fn membership_row(id: &str, list_id: &str, item_id: &str) -> Row {
        row(json!({
            "id": id,
            "list_id": list_id,
            "item_id": item_id,
            "quantity": 1.0,
            "price": 0.0,
            "completed": false,
            "created_at": "2024-01-01T00:00:00Z",
        }))
    }

    #[test]
    fn writes_get_increasing_seq_and_select_is_newest_first() {
        let db = Database::default();
        let a = db
            .insert(Table::Item, item_row("a", "arroz", "2024-01-01T00:00:00Z"))
            .expect("insert a");
        let b = db
            .insert(Table::Item, item_row("b", "feijão", "2024-01-02T00:00:00Z"))
            .expect("insert b");
        assert!(b.seq > a.seq);
        assert_eq!(db.head(), b.seq);

        let (rows, head) = db.select(Table::Item);
        assert_eq!(head, b.seq);
        let ids: Vec<_> = rows.iter().filter_map(VersionedRow::id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn insert_rejects_duplicate_id_and_unknown_column() {
        let db = Database::default();
        db.insert(Table::Item, item_row("a", "arroz", "2024-01-01T00:00:00Z"))
            .expect("insert");
        let err = db
            .insert(Table::Item, item_row("a", "outro", "2024-01-01T00:00:00Z"))
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)), "{}", err);

        let mut bad = item_row("b", "x", "2024-01-01T00:00:00Z");
        bad.insert("colour".to_string(), json!("red"));
        let err = db.insert(Table::Item, bad).unwrap_err();
        assert!(err.to_string().contains("unknown column item.colour"), "{}", err);
    }

    #[test]
    fn conditional_insert_compares_names_case_insensitively() {
        let db = Database::default();
        db.insert_if_absent(
            Table::Item,
            item_row("a", "Arroz", "2024-01-01T00:00:00Z"),
            &["name"],
        )
        .expect("first insert");
        let err = db
            .insert_if_absent(
                Table::Item,
                item_row("b", "  arroz ", "2024-01-01T00:00:00Z"),
                &["name"],
            )
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)), "{}", err);
        assert_eq!(db.select(Table::Item).0.len(), 1);
    }

    #[test]
    fn memberships_must_reference_existing_parents() {
        let db = Database::default();
        db.insert(Table::ShoppingList, list_row("l", "Mercado"))
            .expect("list");
        let err = db
            .insert(Table::ListItem, membership_row("m", "l", "missing"))
            .unwrap_err();
        assert!(err.to_string().contains("references missing item"), "{}", err);
    }

    #[test]
    fn referenced_parent_cannot_be_deleted_until_memberships_go() {
        let db = Database::default();
        db.insert(Table::Item, item_row("i", "arroz", "2024-01-01T00:00:00Z"))
            .expect("item");
        db.insert(Table::ShoppingList, list_row("l", "Mercado"))
            .expect("list");
        db.insert(Table::ListItem, membership_row("m", "l", "i"))
            .expect("membership");

        let err = db.delete(Table::Item, "i").unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)), "{}", err);

        let removed = db
            .delete_where(Table::ListItem, "item_id", "i")
            .expect("delete_where");
        assert_eq!(removed.len(), 1);
        let gone = db.delete(Table::Item, "i").expect("delete item");
        assert!(gone.seq > removed[0].seq);
        assert!(db.select(Table::ShoppingList).0.len() == 1);
    }

    #[test]
    fn update_merges_patch_and_logs_old_row() {
        let db = Database::default();
        let first = db
            .insert(Table::Item, item_row("a", "arroz", "2024-01-01T00:00:00Z"))
            .expect("insert");
        let updated = db
            .update(Table::Item, "a", row(json!({ "category": "Grãos" })))
            .expect("update");
        assert_eq!(updated.row["name"], "arroz");
        assert_eq!(updated.row["category"], "Grãos");

        let batch = db.changes(Some(Table::Item), first.seq, 10);
        assert_eq!(batch.events.len(), 1);
        let ev = &batch.events[0];
        assert_eq!(ev.kind, ChangeKind::Update);
        assert_eq!(ev.old.as_ref().expect("old")["category"], "Geral");

        let err = db
            .update(Table::Item, "missing", row(json!({ "name": "x" })))
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }), "{}", err);
    }

    #[test]
    fn changes_filter_by_table_and_report_resync() {
        let db = Database::new(2);
        db.insert(Table::Item, item_row("a", "a", "2024-01-01T00:00:00Z"))
            .expect("a");
        db.insert(Table::ShoppingList, list_row("l", "Mercado"))
            .expect("l");

        let batch = db.changes(Some(Table::ShoppingList), 0, 10);
        assert!(!batch.resync);
        assert_eq!(batch.events.len(), 1);
        assert_eq!(batch.cursor, 2);

        db.insert(Table::Item, item_row("b", "b", "2024-01-01T00:00:00Z"))
            .expect("b");
        // Capacity 2: the first event is gone.
        assert!(db.changes(None, 0, 10).resync);
        assert!(!db.changes(None, 1, 10).resync);
        assert!(db.changes(None, 99, 10).resync);
    }

    #[test]
    fn changes_respect_limit_with_cursor_at_last_event() {
        let db = Database::default();
        for i in 0..3 {
            db.insert(
                Table::Item,
                item_row(&format!("i{}", i), &format!("n{}", i), "2024-01-01T00:00:00Z"),
            )
            .expect("insert");
        }
        let batch = db.changes(None, 0, 2);
        assert_eq!(batch.events.len(), 2);
        assert_eq!(batch.cursor, 2);
        let rest = db.changes(None, batch.cursor, 2);
        assert_eq!(rest.events.len(), 1);
        assert_eq!(rest.cursor, 3);
    }

    #[test]
    fn wait_changes_wakes_on_commit() {
        let db = std::sync::Arc::new(Database::default());
        let writer = {
            let db = db.clone();
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(50));
                db.insert(Table::Item, item_row("a", "a", "2024-01-01T00:00:00Z"))
                    .expect("insert");
            })
        };
        let batch = db.wait_changes(Some(Table::Item), 0, 10, Duration::from_secs(5));
        writer.join().expect("writer");
        assert_eq!(batch.events.len(), 1);

        let idle = db.wait_changes(Some(Table::Item), 1, 10, Duration::from_millis(20));
        assert!(idle.events.is_empty());
        assert_eq!(idle.cursor, 1);
    }

    #[test]
    fn snapshot_restores_rows_and_forces_resync_for_old_cursors() {
        let db = Database::default();
        db.insert(Table::Item, item_row("a", "a", "2024-01-01T00:00:00Z"))
            .expect("a");
        db.add_user("ana@example.com", "secret", "Ana")
            .expect("user");

        let snapshot = db.snapshot();
        let json = serde_json::to_string(&snapshot).expect("serialize");
        let parsed: DbSnapshot = serde_json::from_str(&json).expect("parse");
        let restored = Database::from_snapshot(parsed, 10).expect("restore");

        assert_eq!(restored.head(), 1);
        assert_eq!(restored.select(Table::Item).0.len(), 1);
        assert!(restored.changes(None, 0, 10).resync);
        assert!(!restored.changes(None, 1, 10).resync);
        assert!(restored.verify_credentials("ana@example.com", "secret").is_some());
    }

    #[test]
    fn credentials_are_checked_against_salted_hash() {
        let db = Database::default();
        let ana = db
            .add_user("Ana@Example.com", "secret", "")
            .expect("user");
        assert_eq!(ana.name, "Ana");

        let found = db
            .verify_credentials("ana@example.com", "secret")
            .expect("identity");
        assert_eq!(found, ana);
        assert!(db.verify_credentials("ana@example.com", "wrong").is_none());
        assert!(db.verify_credentials("bob@example.com", "secret").is_none());

        let err = db.add_user("ana@example.com", "x", "").unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)), "{}", err);
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let db = Database::default();
        db.add_user("a@example.com", "secret", "A").expect("user a");
        db.add_user("b@example.com", "secret", "B").expect("user b");

        let users = serde_json::to_value(db.snapshot().users).expect("json");
        let salts: Vec<&str> = users
            .as_array()
            .expect("array")
            .iter()
            .map(|u| u["salt"].as_str().expect("salt"))
            .collect();
        assert_eq!(salts.len(), 2);
        assert_ne!(salts[0], salts[1]);
        assert!(salts
            .iter()
            .all(|s| s.len() == 32 && s.chars().all(|c| c.is_ascii_hexdigit())));
        assert_ne!(users[0]["password_hash"], users[1]["password_hash"]);
    }
