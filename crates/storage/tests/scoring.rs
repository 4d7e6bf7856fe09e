mod common;

use common::{create_company, dec, harness, vote};
use storage::dto::common::ScoreStatus;
use storage::dto::review::{DimensionRatingInput, SubmitReviewRequest};
use storage::models::{Dimension, NEUTRAL_SCORE, ReviewStatus, ScoreSnapshot};
use storage::store::{CompanyStore, ContributionStore};
use uuid::Uuid;

fn review(user_id: Uuid, ratings: &[(Dimension, i16)]) -> SubmitReviewRequest {
    SubmitReviewRequest {
        user_id,
        rating: 3,
        title: "Mixed experience".to_string(),
        body: "Support was slow, the product works.".to_string(),
        ratings: ratings
            .iter()
            .map(|(dimension, score)| DimensionRatingInput {
                dimension: *dimension,
                score: *score,
            })
            .collect(),
    }
}

#[tokio::test]
async fn company_without_contributions_stays_neutral() {
    let h = harness();
    let company = create_company(h.store.as_ref(), "acme").await;
    assert_eq!(company.scores(), ScoreSnapshot::neutral());

    let recomputed = h
        .aggregator
        .recompute(company.company_id)
        .await
        .expect("recompute");

    assert_eq!(recomputed.scores(), ScoreSnapshot::neutral());
    assert_eq!(recomputed.overall_score, NEUTRAL_SCORE);
    assert_eq!(recomputed.review_count, 0);
}

#[tokio::test]
async fn dimension_score_is_mean_of_votes() {
    let h = harness();
    let company = create_company(h.store.as_ref(), "acme").await;

    for score in [8, 6, 10] {
        h.contributions
            .submit_vote(company.company_id, vote(Uuid::new_v4(), Dimension::Ethics, score))
            .await
            .expect("vote");
    }

    let company = h.store.company(company.company_id).await.expect("company");
    assert_eq!(company.ethics_score, dec("8.0"));
    assert_eq!(company.credibility_score, NEUTRAL_SCORE);
    assert_eq!(company.review_count, 3);
}

#[tokio::test]
async fn resubmitted_vote_replaces_the_previous_one() {
    let h = harness();
    let company = create_company(h.store.as_ref(), "acme").await;
    let user = Uuid::new_v4();

    let first = h
        .contributions
        .submit_vote(company.company_id, vote(user, Dimension::Delivery, 2))
        .await
        .expect("first vote");
    let second = h
        .contributions
        .submit_vote(company.company_id, vote(user, Dimension::Delivery, 9))
        .await
        .expect("second vote");

    assert_eq!(first.vote.vote_id, second.vote.vote_id);
    assert_eq!(second.score_status, ScoreStatus::Updated);

    let counts = h.store.activity_counts(user).await.expect("counts");
    assert_eq!(counts.votes, 1);

    let company = h.store.company(company.company_id).await.expect("company");
    assert_eq!(company.delivery_score, dec("9.0"));
    assert_eq!(company.review_count, 1);

    let reasons: Vec<String> = h
        .store
        .score_history(company.company_id)
        .await
        .expect("history")
        .into_iter()
        .map(|entry| entry.reason)
        .collect();
    assert_eq!(reasons, ["vote inserted", "vote updated"]);
}

#[tokio::test]
async fn retracting_a_vote_returns_the_dimension_to_neutral() {
    let h = harness();
    let company = create_company(h.store.as_ref(), "acme").await;
    let user = Uuid::new_v4();

    h.contributions
        .submit_vote(company.company_id, vote(user, Dimension::Security, 1))
        .await
        .expect("vote");
    let receipt = h
        .contributions
        .retract_vote(company.company_id, user, Dimension::Security)
        .await
        .expect("retract");

    assert_eq!(receipt.vote.score, 1);
    assert_eq!(receipt.reputation, Some(0));

    let company = h.store.company(company.company_id).await.expect("company");
    assert_eq!(company.security_score, NEUTRAL_SCORE);
    assert_eq!(company.overall_score, NEUTRAL_SCORE);

    let missing = h
        .contributions
        .retract_vote(company.company_id, user, Dimension::Security)
        .await;
    assert!(matches!(missing, Err(storage::error::StorageError::NotFound)));
}

#[tokio::test]
async fn only_approved_reviews_count() {
    let h = harness();
    let company = create_company(h.store.as_ref(), "acme").await;
    let company_id = company.company_id;

    h.contributions
        .submit_vote(company_id, vote(Uuid::new_v4(), Dimension::Ethics, 10))
        .await
        .expect("vote");
    let review = h
        .contributions
        .submit_review(company_id, review(Uuid::new_v4(), &[(Dimension::Ethics, 0)]))
        .await
        .expect("review");
    assert_eq!(review.status, ReviewStatus::Pending);

    let pending = h.store.company(company_id).await.expect("company");
    assert_eq!(pending.ethics_score, dec("10"));

    let rejected = h
        .contributions
        .moderate_review(review.review_id, ReviewStatus::Rejected)
        .await
        .expect("reject");
    assert_eq!(rejected.previous_status, ReviewStatus::Pending);
    assert_eq!(rejected.score_status, ScoreStatus::Unchanged);
    assert_eq!(
        h.store.company(company_id).await.expect("company").ethics_score,
        dec("10")
    );

    let approved = h
        .contributions
        .moderate_review(review.review_id, ReviewStatus::Approved)
        .await
        .expect("approve");
    assert_eq!(approved.score_status, ScoreStatus::Updated);
    let company = h.store.company(company_id).await.expect("company");
    assert_eq!(company.ethics_score, dec("5.0"));
    assert_eq!(company.review_count, 2);

    h.contributions
        .moderate_review(review.review_id, ReviewStatus::Flagged)
        .await
        .expect("flag");
    let company = h.store.company(company_id).await.expect("company");
    assert_eq!(company.ethics_score, dec("10"));
    assert_eq!(company.review_count, 1);

    let reasons: Vec<String> = h
        .store
        .score_history(company_id)
        .await
        .expect("history")
        .into_iter()
        .map(|entry| entry.reason)
        .collect();
    assert_eq!(
        reasons,
        ["vote inserted", "review approved", "review unapproved"]
    );
}

#[tokio::test]
async fn approved_review_without_ratings_only_counts_as_contribution() {
    let h = harness();
    let company = create_company(h.store.as_ref(), "acme").await;

    let review = h
        .contributions
        .submit_review(company.company_id, review(Uuid::new_v4(), &[]))
        .await
        .expect("review");
    h.contributions
        .moderate_review(review.review_id, ReviewStatus::Approved)
        .await
        .expect("approve");

    let company = h.store.company(company.company_id).await.expect("company");
    assert_eq!(company.scores(), ScoreSnapshot::neutral());
    assert_eq!(company.review_count, 1);
}

#[tokio::test]
async fn history_has_one_cumulative_entry_per_event() {
    let h = harness();
    let company = create_company(h.store.as_ref(), "acme").await;

    for score in [9, 7, 4] {
        h.contributions
            .submit_vote(company.company_id, vote(Uuid::new_v4(), Dimension::Ethics, score))
            .await
            .expect("vote");
    }

    let history = h
        .store
        .score_history(company.company_id)
        .await
        .expect("history");

    assert_eq!(history.len(), 3);
    assert!(history.windows(2).all(|pair| pair[0].sequence < pair[1].sequence));
    assert!(history.windows(2).all(|pair| pair[0].recorded_at <= pair[1].recorded_at));

    let ethics: Vec<_> = history.iter().map(|entry| entry.ethics_score).collect();
    assert_eq!(ethics, [dec("9"), dec("8"), dec("6.67")]);
}

#[tokio::test]
async fn two_voters_end_to_end() {
    let h = harness();
    let company = create_company(h.store.as_ref(), "company-c").await;
    assert_eq!(company.overall_score, dec("5.0"));

    let first = h
        .contributions
        .submit_vote(company.company_id, vote(Uuid::new_v4(), Dimension::Ethics, 9))
        .await
        .expect("user a votes");
    assert_eq!(first.score_status, ScoreStatus::Updated);

    let after_a = h.store.company(company.company_id).await.expect("company");
    assert_eq!(after_a.ethics_score, dec("9.0"));
    assert_eq!(after_a.overall_score, dec("5.8"));

    h.contributions
        .submit_vote(company.company_id, vote(Uuid::new_v4(), Dimension::Ethics, 7))
        .await
        .expect("user b votes");

    let after_b = h.store.company(company.company_id).await.expect("company");
    assert_eq!(after_b.ethics_score, dec("8.0"));
    assert_eq!(after_b.overall_score, dec("5.6"));

    let history = h
        .store
        .score_history(company.company_id)
        .await
        .expect("history");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].overall_score, dec("5.8"));
    assert_eq!(history[1].overall_score, dec("5.6"));
}

#[tokio::test]
async fn vote_for_unknown_company_is_not_found() {
    let h = harness();

    let result = h
        .contributions
        .submit_vote(Uuid::new_v4(), vote(Uuid::new_v4(), Dimension::Ethics, 5))
        .await;

    assert!(matches!(result, Err(storage::error::StorageError::NotFound)));
}

#[tokio::test]
async fn invalid_vote_is_rejected_before_any_write() {
    let h = harness();
    let company = create_company(h.store.as_ref(), "acme").await;
    let user = Uuid::new_v4();

    let result = h
        .contributions
        .submit_vote(company.company_id, vote(user, Dimension::Ethics, 11))
        .await;

    assert!(matches!(
        result,
        Err(storage::error::StorageError::Validation(_))
    ));
    assert_eq!(h.store.activity_counts(user).await.expect("counts").votes, 0);
    assert!(
        h.store
            .score_history(company.company_id)
            .await
            .expect("history")
            .is_empty()
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_votes_on_one_company_are_all_counted() {
    let h = harness();
    let company = create_company(h.store.as_ref(), "acme").await;
    let scores: [i16; 8] = [6, 7, 8, 9, 10, 6, 7, 8];

    let mut tasks = Vec::new();
    for score in scores {
        let contributions = h.contributions.clone();
        let company_id = company.company_id;
        tasks.push(tokio::spawn(async move {
            contributions
                .submit_vote(company_id, vote(Uuid::new_v4(), Dimension::Ethics, score))
                .await
        }));
    }
    for task in tasks {
        let receipt = task.await.expect("task joined").expect("vote stored");
        assert_eq!(receipt.score_status, ScoreStatus::Updated);
    }

    // 61 / 8 = 7.625
    let company = h.store.company(company.company_id).await.expect("company");
    assert_eq!(company.ethics_score, dec("7.63"));
    assert_eq!(company.review_count, 8);

    let history = h
        .store
        .score_history(company.company_id)
        .await
        .expect("history");
    assert_eq!(history.len(), 8);
    assert!(history.windows(2).all(|pair| pair[0].sequence < pair[1].sequence));
    assert_eq!(history[7].ethics_score, dec("7.63"));
}
