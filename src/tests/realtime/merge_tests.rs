    use super::*;

    use crate::model::Unit;
    use crate::remote::RowRecord;

    fn arroz() -> CatalogItem {
        CatalogItem::new("arroz", "Grãos", Unit::Kg, None)
    }

    fn event(table: Table, kind: ChangeKind, seq: u64, new: Option<Row>, old: Option<Row>) -> ChangeEvent {
        ChangeEvent {
            seq,
            table,
            kind,
            new,
            old,
        }
    }

    #[test]
    fn update_for_unknown_id_upserts() {
        let mut store = EntityStore::default();
        let item = arroz();
        let ev = event(Table::Item, ChangeKind::Update, 3, Some(item.to_row().expect("row")), Some(item.to_row().expect("row")));

        assert_eq!(apply_event(&mut store, &ev), Some(Merge::Applied));
        assert_eq!(store.items().get(&item.id), Some(&item));
    }

    #[test]
    fn insert_for_known_id_acts_as_update() {
        let mut store = EntityStore::default();
        let mut item = arroz();
        apply_event(&mut store, &event(Table::Item, ChangeKind::Insert, 1, Some(item.to_row().expect("row")), None));
        item.name = "arroz integral".to_string();
        apply_event(&mut store, &event(Table::Item, ChangeKind::Insert, 2, Some(item.to_row().expect("row")), None));

        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items().records()[0].name, "arroz integral");
    }

    #[test]
    fn list_delete_cascades_locally() {
        let mut store = EntityStore::default();
        let item = arroz();
        let list = ShoppingList::new("mercado", None, None);
        let m = ListMembership::new(list.id.clone(), item.id.clone(), 1.0, 0.0);
        store.items_mut().upsert(item.clone());
        store.lists_mut().upsert(list.clone());
        store.memberships_mut().upsert(m);

        let ev = event(Table::ShoppingList, ChangeKind::Delete, 5, None, Some(list.to_row().expect("row")));
        assert_eq!(apply_event(&mut store, &ev), Some(Merge::Applied));
        assert!(store.lists().is_empty());
        assert!(store.memberships().is_empty());
        assert_eq!(store.items().len(), 1);
    }

    #[test]
    fn delete_of_unknown_row_is_ignored() {
        let mut store = EntityStore::default();
        let m = ListMembership::new(ListId::from("l"), ItemId::from("i"), 1.0, 0.0);
        let ev = event(Table::ListItem, ChangeKind::Delete, 2, None, Some(m.to_row().expect("row")));
        assert_eq!(apply_event(&mut store, &ev), Some(Merge::Applied));
        assert!(store.memberships().is_empty());
    }

    #[test]
    fn undecodable_row_is_skipped() {
        let mut store = EntityStore::default();
        let mut row = arroz().to_row().expect("row");
        row.insert("created_at".into(), serde_json::Value::from("yesterday"));
        let ev = event(Table::Item, ChangeKind::Insert, 1, Some(row), None);

        assert_eq!(apply_event(&mut store, &ev), None);
        assert!(store.items().is_empty());
    }

    #[test]
    fn stale_event_after_newer_one_is_dropped() {
        let mut store = EntityStore::default();
        let mut item = arroz();
        item.name = "novo".to_string();
        apply_event(&mut store, &event(Table::Item, ChangeKind::Update, 9, Some(item.to_row().expect("row")), None));
        item.name = "velho".to_string();
        let out = apply_event(&mut store, &event(Table::Item, ChangeKind::Update, 4, Some(item.to_row().expect("row")), None));

        assert_eq!(out, Some(Merge::Stale));
        assert_eq!(store.items().records()[0].name, "novo");
    }
