    use super::*;

    use serde_json::json;

    use crate::model::Unit;

    fn adapter() -> (SyncAdapter, LocalBackend) {
        let backend = LocalBackend::default();
        (SyncAdapter::new(Arc::new(backend.clone())), backend)
    }

    #[test]
    fn load_skips_rows_that_do_not_decode() {
        let (adapter, backend) = adapter();
        adapter
            .insert_item(&CatalogItem::new("Arroz", "Grãos", Unit::Kg, None))
            .expect("insert");
        let bad = json!({ "id": "bad", "name": "x", "created_at": "not a time" });
        backend
            .database()
            .insert(Table::Item, bad.as_object().cloned().expect("object"))
            .expect("raw insert");

        let loaded = adapter.load_items().expect("load");
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].record.name, "Arroz");
        assert_eq!(loaded.seq, 2);
    }

    #[test]
    fn unencodable_record_is_not_sent() {
        let (adapter, backend) = adapter();
        let mut item = CatalogItem::new("Arroz", "Grãos", Unit::Kg, None);
        // Year -1200 has no RFC 3339 form.
        item.created_at = time::OffsetDateTime::from_unix_timestamp(-100_000_000_000).expect("timestamp");

        let err = adapter.insert_item(&item).unwrap_err();
        assert!(matches!(err, RemoteError::Encode(_)), "{}", err);
        assert!(err.to_string().contains("item.created_at"), "{}", err);
        assert_eq!(backend.database().head(), 0);
    }

    #[test]
    fn insert_if_absent_reports_conflict_on_same_name() {
        let (adapter, _) = adapter();
        adapter
            .insert_list_if_absent(&ShoppingList::new("Mercado", None, None))
            .expect("first");
        let err = adapter
            .insert_list_if_absent(&ShoppingList::new("mercado", None, None))
            .unwrap_err();
        assert!(err.is_conflict(), "{}", err);
    }

    #[test]
    fn update_returns_acknowledged_record() {
        let (adapter, _) = adapter();
        let stored = adapter
            .insert_item(&CatalogItem::new("Leite", "Geral", Unit::Unidade, None))
            .expect("insert");
        let patch = ItemPatch {
            unit: Some(Unit::Litro),
            ..ItemPatch::default()
        };
        let updated = adapter
            .update_item(&stored.record.id, &patch)
            .expect("update");
        assert_eq!(updated.record.unit, Unit::Litro);
        assert_eq!(updated.record.name, "Leite");
        assert!(updated.seq > stored.seq);
    }

    #[test]
    fn delete_item_removes_memberships_first() {
        let (adapter, backend) = adapter();
        let item = adapter
            .insert_item(&CatalogItem::new("Pão", "Padaria", Unit::Unidade, None))
            .expect("item")
            .record;
        let list = adapter
            .insert_list(&ShoppingList::new("Café", None, None))
            .expect("list")
            .record;
        let m = adapter
            .insert_membership(&ListMembership::new(
                list.id.clone(),
                item.id.clone(),
                2.0,
                0.0,
            ))
            .expect("membership")
            .record;

        let deleted = adapter.delete_item(&item.id).expect("delete");
        assert_eq!(deleted.memberships.len(), 1);
        assert_eq!(deleted.memberships[0].0, m.id);
        assert!(deleted.seq > deleted.memberships[0].1);

        let db = backend.database();
        assert!(db.select(Table::ListItem).0.is_empty());
        assert!(db.select(Table::Item).0.is_empty());
        assert_eq!(db.select(Table::ShoppingList).0.len(), 1);
    }

    #[test]
    fn deleting_unknown_membership_is_not_found() {
        let (adapter, _) = adapter();
        let err = adapter
            .delete_membership(&MembershipId::from("nope"))
            .unwrap_err();
        assert!(matches!(err, RemoteError::NotFound(_)), "{}", err);
    }
