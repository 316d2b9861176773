    use super::*;

    use time::OffsetDateTime;

    use crate::model::Unit;

    fn at(secs: i64) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_700_000_000 + secs).expect("timestamp")
    }

    fn item(id: &str, name: &str, category: &str, secs: i64) -> CatalogItem {
        CatalogItem {
            id: ItemId::from(id),
            name: name.to_string(),
            category: category.to_string(),
            unit: Unit::Unidade,
            created_at: at(secs),
            owner: None,
        }
    }

    fn list(id: &str, name: &str, secs: i64) -> ShoppingList {
        ShoppingList {
            id: ListId::from(id),
            name: name.to_string(),
            description: None,
            created_at: at(secs),
            owner: None,
        }
    }

    fn member(id: &str, list_id: &str, item_id: &str, q: f64, p: f64) -> ListMembership {
        ListMembership {
            id: MembershipId::from(id),
            list_id: ListId::from(list_id),
            item_id: ItemId::from(item_id),
            quantity: q,
            price: p,
            completed: false,
            created_at: at(0),
        }
    }

    fn names(store: &EntityStore) -> Vec<String> {
        store.items().records().iter().map(|i| i.name.clone()).collect()
    }

    #[test]
    fn upsert_many_is_order_independent_and_newest_first() {
        let a = item("a", "arroz", "Grãos", 1);
        let b = item("b", "leite", "Laticínios", 3);
        let c = item("c", "pão", "Padaria", 2);

        let mut one = EntityStore::default();
        one.items_mut().upsert_many([a.clone(), b.clone(), c.clone()]);
        let mut two = EntityStore::default();
        two.items_mut().upsert_many([c, a, b.clone(), b]);

        assert_eq!(names(&one), vec!["leite", "pão", "arroz"]);
        assert_eq!(names(&one), names(&two));
    }

    #[test]
    fn upsert_replaces_by_id() {
        let mut store = EntityStore::default();
        store.items_mut().upsert(item("a", "arroz", "Grãos", 1));
        store.items_mut().upsert(item("a", "arroz integral", "Grãos", 1));
        assert_eq!(names(&store), vec!["arroz integral"]);
    }

    #[test]
    fn memberships_for_filters_by_list() {
        let mut store = EntityStore::default();
        store.memberships_mut().upsert_many([
            member("m1", "l1", "a", 1.0, 0.0),
            member("m2", "l2", "a", 1.0, 0.0),
            member("m3", "l1", "b", 1.0, 0.0),
        ]);
        let ids: Vec<_> = store
            .memberships_for(&ListId::from("l1"))
            .into_iter()
            .map(|m| m.id.0)
            .collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&"m1".to_string()) && ids.contains(&"m3".to_string()));
    }

    #[test]
    fn stale_change_does_not_revert_newer_version() {
        let mut store = EntityStore::default();
        let id = ItemId::from("a");
        let out = store.merge_item(&id, Change::Upsert(item("a", "novo nome", "X", 1)), 7);
        assert_eq!(out, Merge::Applied);

        let out = store.merge_item(&id, Change::Upsert(item("a", "velho", "X", 1)), 5);
        assert_eq!(out, Merge::Stale);
        assert_eq!(names(&store), vec!["novo nome"]);
    }

    #[test]
    fn tombstone_blocks_late_resurrection() {
        let mut store = EntityStore::default();
        let id = ItemId::from("a");
        store.merge_item(&id, Change::Upsert(item("a", "arroz", "X", 1)), 2);
        assert_eq!(store.merge_item(&id, Change::Delete, 4), Merge::Applied);

        let out = store.merge_item(&id, Change::Upsert(item("a", "arroz", "X", 1)), 3);
        assert_eq!(out, Merge::Stale);
        assert!(store.items().is_empty());
        assert_eq!(store.items().version(&id), Some(4));
    }

    #[test]
    fn delete_of_unknown_id_is_harmless() {
        let mut store = EntityStore::default();
        let out = store.merge_list(&ListId::from("ghost"), Change::Delete, 9);
        assert_eq!(out, Merge::Applied);
        assert!(store.lists().is_empty());
    }

    #[test]
    fn list_delete_cascades_memberships_and_keeps_items() {
        let mut store = EntityStore::default();
        store.items_mut().upsert(item("a", "arroz", "X", 1));
        store.lists_mut().upsert(list("l1", "mercado", 1));
        store.memberships_mut().upsert_many([
            member("m1", "l1", "a", 1.0, 0.0),
            member("m2", "l2", "a", 1.0, 0.0),
        ]);

        store.merge_list(&ListId::from("l1"), Change::Delete, 3);
        assert!(store.lists().is_empty());
        assert_eq!(store.items().len(), 1);
        let left: Vec<_> = store
            .memberships()
            .records()
            .iter()
            .map(|m| m.id.0.clone())
            .collect();
        assert_eq!(left, vec!["m2"]);
    }

    #[test]
    fn change_for_pending_id_is_held_until_ack() {
        let mut store = EntityStore::default();
        let id = ItemId::from("a");
        store.items_mut().begin_write(&id);
        store.items_mut().upsert(item("a", "local", "X", 1));

        // Another client's write committed before ours.
        let out = store.merge_item(&id, Change::Upsert(item("a", "remoto", "X", 1)), 3);
        assert_eq!(out, Merge::Held);
        assert_eq!(names(&store), vec!["local"]);

        // Our write committed later; the held change is older and dropped.
        store.settle_item(&id, Some((5, Change::Upsert(item("a", "local", "X", 1)))));
        assert_eq!(names(&store), vec!["local"]);
        assert_eq!(store.items().version(&id), Some(5));
        assert!(!store.items().has_pending_write(&id));
    }

    #[test]
    fn newer_held_change_wins_after_ack() {
        let mut store = EntityStore::default();
        let id = ItemId::from("a");
        store.items_mut().begin_write(&id);
        store.items_mut().upsert(item("a", "local", "X", 1));

        store.merge_item(&id, Change::Upsert(item("a", "remoto", "X", 1)), 8);
        store.settle_item(&id, Some((6, Change::Upsert(item("a", "local", "X", 1)))));
        assert_eq!(names(&store), vec!["remoto"]);
        assert_eq!(store.items().version(&id), Some(8));
    }

    #[test]
    fn failed_write_releases_held_change() {
        let mut store = EntityStore::default();
        let id = ListId::from("l1");
        store.lists_mut().begin_write(&id);
        store.lists_mut().upsert(list("l1", "local", 1));

        assert_eq!(store.merge_list(&id, Change::Delete, 4), Merge::Held);
        assert_eq!(store.lists().len(), 1);

        store.settle_list(&id, None);
        assert!(store.lists().is_empty());
    }

    #[test]
    fn replace_drops_absent_records_but_keeps_newer_and_pending() {
        let mut store = EntityStore::default();
        store.merge_item(&ItemId::from("old"), Change::Upsert(item("old", "velho", "X", 1)), 2);
        store.merge_item(&ItemId::from("new"), Change::Upsert(item("new", "novo", "X", 2)), 12);
        store.items_mut().begin_write(&ItemId::from("mine"));
        store.items_mut().upsert(item("mine", "meu", "X", 3));

        let loaded = Loaded {
            records: vec![Stored {
                record: item("kept", "mantido", "X", 0),
                seq: 5,
            }],
            seq: 10,
        };
        let dropped = store.replace_items(loaded);

        assert_eq!(dropped, 1);
        let mut left = names(&store);
        left.sort();
        assert_eq!(left, vec!["mantido", "meu", "novo"]);
    }

    #[test]
    fn reload_prunes_tombstones_but_still_blocks_resurrection() {
        let mut store = EntityStore::default();
        let id = ItemId::from("a");
        store.merge_item(&id, Change::Upsert(item("a", "arroz", "X", 1)), 2);
        store.merge_item(&id, Change::Delete, 4);
        store.merge_item(&ItemId::from("ghost"), Change::Delete, 5);
        assert_eq!(store.items().tracked_versions(), 2);

        store.replace_items(Loaded {
            records: vec![Stored {
                record: item("b", "feijão", "X", 2),
                seq: 6,
            }],
            seq: 6,
        });
        assert_eq!(store.items().tracked_versions(), 1);
        assert_eq!(store.items().version(&id), None);

        // A late insert committed before the reload is still refused.
        let out = store.merge_item(&id, Change::Upsert(item("a", "arroz", "X", 1)), 3);
        assert_eq!(out, Merge::Stale);
        assert_eq!(names(&store), vec!["feijão"]);

        let out = store.merge_item(&ItemId::from("c"), Change::Upsert(item("c", "café", "X", 3)), 7);
        assert_eq!(out, Merge::Applied);
        assert_eq!(store.items().len(), 2);
    }

    #[test]
    fn status_flags_nest() {
        let mut store = EntityStore::default();
        store.begin_loading();
        store.begin_loading();
        store.end_loading();
        assert!(store.loading());
        store.end_loading();
        assert!(!store.loading());

        store.set_error("boom");
        assert_eq!(store.error(), Some("boom"));
        store.clear_error();
        assert_eq!(store.error(), None);
    }

    fn catalog() -> Snapshot {
        let mut store = EntityStore::default();
        store.items_mut().upsert_many([
            item("a", "Arroz", "Grãos", 1),
            item("f", "Feijão", "Grãos", 2),
            item("l", "Leite", "Laticínios", 3),
        ]);
        store
            .lists_mut()
            .upsert_many([list("l1", "Mercado", 1), list("l2", "Feira", 2)]);
        let mut done = member("m2", "l1", "l", 2.0, 4.5);
        done.completed = true;
        store.memberships_mut().upsert_many([
            member("m1", "l1", "a", 1.0, 10.0),
            done,
            member("m3", "l2", "a", 3.0, 1.0),
            member("m4", "l1", "missing", 1.0, 100.0),
        ]);
        store.snapshot()
    }

    #[test]
    fn list_summary_totals_price_times_quantity() {
        let snap = catalog();
        let summary = snap.list_summary(&ListId::from("l1"));
        // m4 points at an item that is not loaded.
        assert_eq!(summary.entries, 2);
        assert_eq!(summary.completed, 1);
        assert!((summary.total - 19.0).abs() < 1e-9);
        assert_eq!(summary.entries, snap.entries(&ListId::from("l1")).len());
    }

    #[test]
    fn grouping_skips_dangling_memberships() {
        let snap = catalog();
        let groups = snap.grouped_by_category(&ListId::from("l1"));
        let shape: Vec<(String, usize)> = groups
            .iter()
            .map(|g| (g.category.clone(), g.entries.len()))
            .collect();
        assert_eq!(shape.len(), 2);
        assert!(shape.contains(&("Grãos".to_string(), 1)));
        assert!(shape.contains(&("Laticínios".to_string(), 1)));
        assert!(snap.grouped_by_category(&ListId::from("nope")).is_empty());
    }

    #[test]
    fn search_matches_name_or_category() {
        let snap = catalog();
        let hits: Vec<_> = snap.search_items("grã").iter().map(|i| i.name.clone()).collect();
        assert_eq!(hits.len(), 2);
        let hits: Vec<_> = snap.search_items("LEI").iter().map(|i| i.name.clone()).collect();
        assert_eq!(hits, vec!["Leite"]);
    }

    #[test]
    fn linked_and_available_views() {
        let snap = catalog();
        let linked: Vec<_> = snap
            .linked_lists(&ItemId::from("a"))
            .iter()
            .map(|l| l.name.clone())
            .collect();
        assert_eq!(linked.len(), 2);

        let available: Vec<_> = snap
            .available_items(&ListId::from("l2"), "")
            .iter()
            .map(|i| i.name.clone())
            .collect();
        assert_eq!(available.len(), 2);
        assert!(!available.contains(&"Arroz".to_string()));
    }
