use anyhow::Result;
use memsearch::{
    find_and_remove_duplicates, process_queries, process_queries_joined, Document, DocumentStatus,
    SearchError, SearchIndex, MAX_RESULT_DOCUMENT_COUNT,
};

const EPS: f64 = 1e-6;

/// Four-document fixture used across the ranking tests.
fn sample_index() -> Result<SearchIndex> {
    let mut index = SearchIndex::with_stop_words_text("in the on")?;
    index.add_document(0, "white cat and fashionable collar", DocumentStatus::Actual, &[8, -3])?;
    index.add_document(1, "fluffy cat fluffy tail", DocumentStatus::Actual, &[7, 2, 7])?;
    index.add_document(2, "groomed dog expressive eyes", DocumentStatus::Actual, &[5, -12, 2, 1])?;
    index.add_document(3, "groomed starling eugene", DocumentStatus::Banned, &[9])?;
    Ok(index)
}

fn ids(documents: &[Document]) -> Vec<i32> {
    documents.iter().map(|doc| doc.id).collect()
}

#[test]
fn term_frequencies_sum_to_one() -> Result<()> {
    let index = sample_index()?;
    for document_id in index.document_ids().collect::<Vec<_>>() {
        let total: f64 = index.word_frequencies(document_id).values().sum();
        assert!((total - 1.0).abs() < EPS, "document {document_id} sums to {total}");
    }
    Ok(())
}

#[test]
fn document_count_tracks_adds_and_removes() -> Result<()> {
    let mut index = sample_index()?;
    assert_eq!(index.document_count(), 4);
    index.remove_document(1);
    index.remove_document(1); // unknown id: silent no-op
    index.remove_document(99);
    assert_eq!(index.document_count(), 3);
    index.add_document(10, "one more", DocumentStatus::Actual, &[])?;
    assert_eq!(index.document_count(), 4);
    Ok(())
}

#[test]
fn stop_words_never_match_or_appear_in_frequencies() -> Result<()> {
    let mut index = SearchIndex::with_stop_words_text("in the")?;
    index.add_document(42, "cat in the city", DocumentStatus::Actual, &[1, 2, 3])?;

    assert!(index.find_top_documents("in")?.is_empty());
    let found = index.find_top_documents("cat")?;
    assert_eq!(ids(&found), vec![42]);
    assert_eq!(found[0].rating, 2);

    let freqs = index.word_frequencies(42);
    assert!(!freqs.contains_key("in"));
    assert!(!freqs.contains_key("the"));
    assert_eq!(freqs.len(), 2);
    Ok(())
}

#[test]
fn add_then_remove_restores_previous_results() -> Result<()> {
    let mut index = sample_index()?;
    let before = index.find_top_documents("fluffy groomed cat")?;
    index.add_document(7, "fluffy fluffy fluffy", DocumentStatus::Actual, &[10])?;
    assert_ne!(index.find_top_documents("fluffy groomed cat")?, before);
    index.remove_document(7);
    assert_eq!(index.find_top_documents("fluffy groomed cat")?, before);
    Ok(())
}

#[test]
fn ranking_orders_by_tf_idf_relevance() -> Result<()> {
    let index = sample_index()?;
    let found = index.find_top_documents("fluffy groomed cat")?;
    assert_eq!(ids(&found), vec![1, 2, 0]);

    // ln(4/1) * 2/4 + ln(4/2) * 1/4
    assert!((found[0].relevance - 0.866_434).abs() < 1e-5);
    // ln(4/2) * 1/4
    assert!((found[1].relevance - 0.173_287).abs() < 1e-5);
    // ln(4/2) * 1/5
    assert!((found[2].relevance - 0.138_629).abs() < 1e-5);
    Ok(())
}

#[test]
fn equal_relevance_breaks_ties_by_rating() -> Result<()> {
    let mut index = SearchIndex::with_stop_words_text("")?;
    index.add_document(1, "cat walk", DocumentStatus::Actual, &[1])?;
    index.add_document(2, "cat sleep", DocumentStatus::Actual, &[9])?;
    index.add_document(3, "cat hunt", DocumentStatus::Actual, &[4])?;
    let found = index.find_top_documents("cat")?;
    assert_eq!(ids(&found), vec![2, 3, 1]);
    Ok(())
}

#[test]
fn results_are_truncated_to_five() -> Result<()> {
    let mut index = SearchIndex::with_stop_words_text("")?;
    for id in 0..8 {
        index.add_document(id, "cat", DocumentStatus::Actual, &[id])?;
    }
    let found = index.find_top_documents("cat")?;
    assert_eq!(found.len(), MAX_RESULT_DOCUMENT_COUNT);
    Ok(())
}

#[test]
fn status_filter_and_predicate_overloads() -> Result<()> {
    let index = sample_index()?;
    let banned = index.find_top_documents_with_status("groomed", DocumentStatus::Banned)?;
    assert_eq!(ids(&banned), vec![3]);

    let mut rated = SearchIndex::with_stop_words_text("")?;
    rated.add_document(0, "cat", DocumentStatus::Actual, &[0])?;
    rated.add_document(1, "cat", DocumentStatus::Actual, &[5])?;
    rated.add_document(2, "cat", DocumentStatus::Actual, &[10])?;
    let found = rated.find_top_documents_by("cat", |_, _, rating| rating > 5)?;
    assert_eq!(ids(&found), vec![2]);
    Ok(())
}

#[test]
fn minus_terms_exclude_unconditionally() -> Result<()> {
    let index = sample_index()?;
    let found = index.find_top_documents("fluffy groomed cat -dog")?;
    assert_eq!(ids(&found), vec![1, 0]);
    // even documents the predicate accepts are excluded
    let found = index.find_top_documents_by("cat -tail", |_, _, _| true)?;
    assert_eq!(ids(&found), vec![0]);
    Ok(())
}

#[test]
fn match_document_reports_plus_terms_sorted() -> Result<()> {
    let index = sample_index()?;
    let (words, status) = index.match_document("tail fluffy collar", 1)?;
    assert_eq!(words, vec!["fluffy".to_string(), "tail".to_string()]);
    assert_eq!(status, DocumentStatus::Actual);
    Ok(())
}

#[test]
fn match_document_minus_term_empties_the_match() -> Result<()> {
    let mut index = SearchIndex::with_stop_words_text("")?;
    index.add_document(0, "white cat and fancy collar", DocumentStatus::Actual, &[])?;
    let (words, status) = index.match_document("fluffy -cat", 0)?;
    assert!(words.is_empty());
    assert_eq!(status, DocumentStatus::Actual);
    Ok(())
}

#[test]
fn match_document_unknown_id_is_out_of_range() -> Result<()> {
    let index = sample_index()?;
    assert_eq!(index.match_document("cat", 99), Err(SearchError::OutOfRange(99)));
    assert_eq!(index.match_document_par("cat", 99), Err(SearchError::OutOfRange(99)));
    Ok(())
}

#[test]
fn malformed_queries_are_invalid_arguments() -> Result<()> {
    let index = sample_index()?;
    for raw_query in ["-", "cat -", "--cat", "ca\u{1}t"] {
        assert!(
            matches!(index.find_top_documents(raw_query), Err(SearchError::InvalidArgument(_))),
            "query {raw_query:?} should be rejected"
        );
        assert!(matches!(
            index.match_document(raw_query, 0),
            Err(SearchError::InvalidArgument(_))
        ));
    }
    Ok(())
}

#[test]
fn duplicate_documents_are_detected_and_removed() -> Result<()> {
    let mut index = SearchIndex::with_stop_words_text("and")?;
    index.add_document(1, "funny pet and nasty rat", DocumentStatus::Actual, &[7])?;
    index.add_document(2, "funny pet with curly hair", DocumentStatus::Actual, &[])?;
    index.add_document(3, "funny funny pet and nasty nasty rat", DocumentStatus::Actual, &[])?;
    index.add_document(4, "nasty rat pet funny", DocumentStatus::Actual, &[])?;

    let removed = find_and_remove_duplicates(&mut index);
    assert_eq!(removed, vec![3, 4]);
    assert_eq!(index.document_ids().collect::<Vec<_>>(), vec![1, 2]);
    Ok(())
}

#[test]
fn parallel_paths_match_sequential_results() -> Result<()> {
    let index = sample_index()?;
    for raw_query in ["fluffy groomed cat", "cat -tail", "groomed", "absent words"] {
        assert_eq!(
            index.find_top_documents(raw_query)?,
            index.find_top_documents_par(raw_query)?,
            "query {raw_query:?}"
        );
        for document_id in index.document_ids().collect::<Vec<_>>() {
            assert_eq!(
                index.match_document(raw_query, document_id)?,
                index.match_document_par(raw_query, document_id)?
            );
        }
    }
    let banned = index.find_top_documents_with_status_par("groomed", DocumentStatus::Banned)?;
    assert_eq!(ids(&banned), vec![3]);
    Ok(())
}

#[test]
fn batch_queries_match_individual_evaluation() -> Result<()> {
    let index = sample_index()?;
    let queries: Vec<String> = ["fluffy cat", "groomed -dog", "starling"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let batched = process_queries(&index, &queries)?;
    assert_eq!(batched.len(), queries.len());
    for (raw_query, result) in queries.iter().zip(&batched) {
        assert_eq!(result, &index.find_top_documents(raw_query)?);
    }

    let joined = process_queries_joined(&index, &queries)?;
    let flattened: Vec<Document> = batched.into_iter().flatten().collect();
    assert_eq!(joined, flattened);
    Ok(())
}

#[test]
fn batch_queries_propagate_parse_errors() -> Result<()> {
    let index = sample_index()?;
    let queries = vec!["cat".to_string(), "--bad".to_string()];
    assert!(matches!(
        process_queries(&index, &queries),
        Err(SearchError::InvalidArgument(_))
    ));
    Ok(())
}

#[test]
fn word_frequencies_for_unknown_id_is_empty() -> Result<()> {
    let index = sample_index()?;
    assert!(index.word_frequencies(12345).is_empty());
    Ok(())
}
