    use super::*;

    use crate::model::Unit;

    fn items(names: &[&str]) -> Vec<CatalogItem> {
        names
            .iter()
            .map(|n| CatalogItem::new(n, "Geral", Unit::Unidade, None))
            .collect()
    }

    fn found_name<T: Named>(r: Resolution<'_, T>) -> Option<String> {
        match r {
            Resolution::Found(t) => Some(t.name().to_string()),
            _ => None,
        }
    }

    #[test]
    fn shorter_query_resolves_to_longer_stored_name() {
        let catalog = items(&["Leite Integral"]);
        assert_eq!(found_name(resolve("leite", &catalog)), Some("Leite Integral".into()));
    }

    #[test]
    fn longer_query_never_resolves_to_shorter_name() {
        let catalog = items(&["Leite"]);
        let r = resolve("leite integral", &catalog);
        // Only the first word matches, so the stored item is offered, not picked.
        assert!(matches!(r, Resolution::Suggestions(ref s) if s.len() == 1), "{:?}", r);
    }

    #[test]
    fn exact_match_beats_substring_matches() {
        let catalog = items(&["Leite Integral", "Leite", "Leite Desnatado"]);
        assert_eq!(found_name(resolve("LEITE", &catalog)), Some("Leite".into()));
    }

    #[test]
    fn several_substring_matches_are_ambiguous() {
        let catalog = items(&["Leite Integral", "Leite Desnatado", "Pão"]);
        match resolve("lei", &catalog) {
            Resolution::Ambiguous(hits) => {
                assert_eq!(join_names(&hits), "Leite Integral, Leite Desnatado")
            }
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }

    #[test]
    fn first_word_fallback_suggests_candidates() {
        let catalog = items(&["Arroz Branco", "Arroz Integral", "Feijão"]);
        match resolve("arroz parboilizado", &catalog) {
            Resolution::Suggestions(hits) => assert_eq!(hits.len(), 2),
            other => panic!("expected suggestions, got {:?}", other),
        }
    }

    #[test]
    fn nothing_matching_is_not_found() {
        let catalog = items(&["Arroz"]);
        assert_eq!(resolve("leite", &catalog), Resolution::NotFound);
        assert_eq!(resolve("leite condensado", &catalog), Resolution::NotFound);
        assert_eq!(resolve("   ", &catalog), Resolution::NotFound);
    }
