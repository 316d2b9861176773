    use super::*;

    fn item(name: &str, category: &str, unit: Unit) -> Intent {
        Intent::CreateItem {
            name: name.to_string(),
            category: category.to_string(),
            unit,
        }
    }

    #[test]
    fn templates_follow_priority_order() {
        assert_eq!(parse("del lista Mercado"), Intent::DeleteList("mercado".into()));
        assert_eq!(parse("del leite"), Intent::DeleteItem("leite".into()));
        assert_eq!(parse("del lista"), Intent::DeleteItem("lista".into()));
        assert_eq!(parse("edit lista feira"), Intent::EditList("feira".into()));
        assert_eq!(parse("edit pão"), Intent::EditItem("pão".into()));
        assert_eq!(parse("add lista Feira do Mês"), Intent::CreateList("feira do mês".into()));
        assert_eq!(
            parse("add lista na mercado"),
            Intent::CreateList("na mercado".into())
        );
    }

    #[test]
    fn input_is_trimmed_and_lower_cased() {
        assert_eq!(
            parse("   ADD Arroz NA Mercado  "),
            Intent::AddToList {
                item: "arroz".into(),
                list: "mercado".into()
            }
        );
    }

    #[test]
    fn novo_defaults_category_and_unit() {
        assert_eq!(parse("novo arroz"), item("arroz", DEFAULT_CATEGORY, Unit::Unidade));
        assert_eq!(parse("novo leite de caixa"), item("leite de caixa", "Geral", Unit::Unidade));
    }

    #[test]
    fn novo_reads_category_and_unit_clauses() {
        assert_eq!(parse("novo arroz kg"), item("arroz", "Geral", Unit::Kg));
        assert_eq!(
            parse("novo arroz categoria grãos"),
            item("arroz", "grãos", Unit::Unidade)
        );
        assert_eq!(
            parse("novo suco de uva categoria bebidas litro"),
            item("suco de uva", "bebidas", Unit::Litro)
        );
        assert_eq!(
            parse("novo carne categoria açougue e frios kg"),
            item("carne", "açougue e frios", Unit::Kg)
        );
    }

    #[test]
    fn novo_keeps_dangling_keyword_in_name() {
        assert_eq!(
            parse("novo arroz categoria"),
            item("arroz categoria", "Geral", Unit::Unidade)
        );
        assert_eq!(parse("novo kg"), item("kg", "Geral", Unit::Unidade));
    }

    #[test]
    fn add_splits_at_first_na() {
        assert_eq!(
            parse("add banana na feira na praça"),
            Intent::AddToList {
                item: "banana".into(),
                list: "feira na praça".into()
            }
        );
        assert_eq!(
            parse("add banana nanica na feira"),
            Intent::AddToList {
                item: "banana nanica".into(),
                list: "feira".into()
            }
        );
    }

    #[test]
    fn unknown_and_incomplete_input_is_unrecognized() {
        assert_eq!(parse("comprar pão"), Intent::Unrecognized);
        assert_eq!(parse("add arroz"), Intent::Unrecognized);
        assert_eq!(parse("add arroz na"), Intent::Unrecognized);
        assert_eq!(parse(""), Intent::Unrecognized);
        assert_eq!(parse("novo"), Intent::Unrecognized);
    }
