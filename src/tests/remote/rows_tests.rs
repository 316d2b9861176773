    use super::*;

    use serde_json::json;

    fn at(secs: i64) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_700_000_000 + secs).expect("timestamp")
    }

    fn row(v: Value) -> Row {
        v.as_object().cloned().expect("object")
    }

    #[test]
    fn item_row_uses_backend_column_names() {
        let item = CatalogItem {
            id: ItemId::from("i1"),
            name: "Arroz".to_string(),
            category: "Grãos".to_string(),
            unit: Unit::Kg,
            created_at: at(0),
            owner: Some(UserId::from("u1")),
        };
        let r = item.to_row().expect("row");
        assert_eq!(r["id"], "i1");
        assert_eq!(r["unit"], "kg");
        assert_eq!(r["owner_id"], "u1");
        assert_eq!(r["created_at"], "2023-11-14T22:13:20Z");
        for key in r.keys() {
            assert!(Table::Item.columns().contains(&key.as_str()), "{}", key);
        }

        assert_eq!(CatalogItem::from_row(&r).expect("decode"), item);
    }

    #[test]
    fn timestamp_without_rfc3339_form_fails_to_encode() {
        let list = ShoppingList {
            id: ListId::from("l1"),
            name: "Feira".to_string(),
            description: None,
            created_at: OffsetDateTime::from_unix_timestamp(-100_000_000_000).expect("timestamp"),
            owner: None,
        };
        let err = list.to_row().unwrap_err();
        assert!(matches!(err, RowError::Format { table: Table::ShoppingList, .. }), "{}", err);
    }

    #[test]
    fn item_row_fills_defaults_for_optional_columns() {
        let r = row(json!({
            "id": "i1",
            "name": "Sal",
            "created_at": "2024-03-01T10:00:00.250Z",
        }));
        let item = CatalogItem::from_row(&r).expect("decode");
        assert_eq!(item.unit, Unit::Unidade);
        assert_eq!(item.category, "");
        assert!(item.owner.is_none());
        assert_eq!(item.created_at.millisecond(), 250);
    }

    #[test]
    fn empty_list_description_reads_as_none() {
        let list = ShoppingList {
            id: ListId::from("l1"),
            name: "Mercado".to_string(),
            description: None,
            created_at: at(5),
            owner: None,
        };
        let r = list.to_row().expect("row");
        assert_eq!(r["description"], "");
        assert_eq!(ShoppingList::from_row(&r).expect("decode"), list);
    }

    #[test]
    fn membership_row_keeps_numbers_and_flag() {
        let m = ListMembership {
            id: MembershipId::from("m1"),
            list_id: ListId::from("l1"),
            item_id: ItemId::from("i1"),
            quantity: 2.5,
            price: 7.9,
            completed: true,
            created_at: at(9),
        };
        let r = m.to_row().expect("row");
        assert_eq!(r["quantity"], 2.5);
        assert_eq!(r["completed"], true);
        assert_eq!(ListMembership::from_row(&r).expect("decode"), m);
    }

    #[test]
    fn malformed_rows_are_rejected() {
        let err = CatalogItem::from_row(&row(json!({ "id": "i1" }))).unwrap_err();
        assert!(matches!(err, RowError::Shape { table: Table::Item, .. }), "{}", err);

        let err = ShoppingList::from_row(&row(json!({
            "id": "l1",
            "name": "x",
            "created_at": "yesterday",
        })))
        .unwrap_err();
        assert!(err.to_string().contains("yesterday"), "{}", err);
    }

    #[test]
    fn patch_rows_only_carry_set_fields() {
        let r = item_patch_row(&ItemPatch {
            category: Some("Limpeza".to_string()),
            ..ItemPatch::default()
        });
        assert_eq!(r.len(), 1);
        assert_eq!(r["category"], "Limpeza");

        let r = list_patch_row(&ListPatch {
            name: None,
            description: Some(None),
        });
        assert_eq!(r["description"], "");

        let r = membership_patch_row(&MembershipPatch {
            completed: Some(false),
            ..MembershipPatch::default()
        });
        assert_eq!(r.len(), 1);
        assert_eq!(r["completed"], false);
    }
