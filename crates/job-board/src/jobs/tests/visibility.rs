use super::common::*;
use crate::jobs::domain::{Caller, JobStatus};
use crate::jobs::query::{JobFilter, JobView};
use crate::jobs::store::JobStore;

#[test]
fn non_admin_callers_always_get_the_public_predicate() {
    let public = Caller::public();
    for view in [
        JobView::Live,
        JobView::Published,
        JobView::Hidden,
        JobView::Filled,
        JobView::Deleted,
        JobView::All,
    ] {
        assert_eq!(JobFilter::for_caller(&public, view), JobFilter::public());
    }
}

#[test]
fn admin_views_map_to_the_documented_predicates() {
    let admin = admin();

    let live = JobFilter::for_caller(&admin, JobView::Live);
    assert_eq!(live.deleted, Some(false));
    assert_eq!(live.active, None);
    assert_eq!(live.status, None);

    let published = JobFilter::for_caller(&admin, JobView::Published);
    assert_eq!(published.deleted, Some(false));
    assert_eq!(published.active, Some(true));

    let hidden = JobFilter::for_caller(&admin, JobView::Hidden);
    assert_eq!(hidden.deleted, Some(false));
    assert_eq!(hidden.active, Some(false));

    let filled = JobFilter::for_caller(&admin, JobView::Filled);
    assert_eq!(filled.deleted, Some(false));
    assert_eq!(filled.status, Some(JobStatus::Filled));

    let deleted = JobFilter::for_caller(&admin, JobView::Deleted);
    assert_eq!(deleted.deleted, Some(true));

    assert_eq!(
        JobFilter::for_caller(&admin, JobView::All),
        JobFilter::default()
    );
}

#[test]
fn legacy_flags_resolve_with_deleted_over_filled_over_all() {
    assert_eq!(JobView::from_flags(true, true, true), JobView::Deleted);
    assert_eq!(JobView::from_flags(false, true, true), JobView::Filled);
    assert_eq!(JobView::from_flags(false, false, true), JobView::All);
    assert_eq!(JobView::from_flags(false, false, false), JobView::Live);
}

#[test]
fn public_listing_never_exposes_deleted_hidden_or_filled_postings() {
    let (_store, service) = build_service();
    let caller = admin();

    let open = service.create(&caller, draft("Cook")).expect("open job");
    let hidden = service.create(&caller, draft("Waiter")).expect("hidden job");
    service
        .set_active(&caller, &hidden.id, false)
        .expect("hide job");
    let filled = service.create(&caller, draft("Driver")).expect("filled job");
    service
        .fill(&caller, &filled.id, fill_details("Jane Doe"))
        .expect("fill job");
    let deleted = service
        .create(&caller, draft("Cleaner"))
        .expect("deleted job");
    service
        .soft_delete(&caller, &deleted.id)
        .expect("delete job");

    let listing = service
        .list(&Caller::public(), JobView::All)
        .expect("public listing");
    let ids: Vec<_> = listing.iter().map(|job| job.id.clone()).collect();

    assert_eq!(ids, vec![open.id]);
    assert!(listing.iter().all(|job| job.publicly_listable()));
}

#[test]
fn admin_views_partition_the_postings() {
    let (_store, service) = build_service();
    let caller = admin();

    let open = service.create(&caller, draft("Cook")).expect("open job");
    let hidden = service.create(&caller, draft("Waiter")).expect("hidden job");
    service
        .set_active(&caller, &hidden.id, false)
        .expect("hide job");
    let filled = service.create(&caller, draft("Driver")).expect("filled job");
    service
        .fill(&caller, &filled.id, fill_details("Jane Doe"))
        .expect("fill job");
    let deleted = service
        .create(&caller, draft("Cleaner"))
        .expect("deleted job");
    service
        .soft_delete(&caller, &deleted.id)
        .expect("delete job");

    let by_view = |view: JobView| -> Vec<crate::jobs::domain::JobId> {
        service
            .list(&caller, view)
            .expect("listing")
            .into_iter()
            .map(|job| job.id)
            .collect()
    };

    let live = by_view(JobView::Live);
    assert!(live.contains(&open.id) && live.contains(&hidden.id) && live.contains(&filled.id));
    assert!(!live.contains(&deleted.id));

    assert_eq!(by_view(JobView::Published), vec![open.id.clone()]);
    assert!(by_view(JobView::Hidden).contains(&hidden.id));
    assert_eq!(by_view(JobView::Filled), vec![filled.id.clone()]);
    assert_eq!(by_view(JobView::Deleted), vec![deleted.id.clone()]);
    assert_eq!(by_view(JobView::All).len(), 4);
}

// A soft-deleted FILLED posting must drop out of the "filled" view: that tab
// requires a live record.
#[test]
fn deleting_a_filled_posting_moves_it_between_views() {
    let (_store, service) = build_service();
    let caller = admin();

    let job = service.create(&caller, draft("Driver")).expect("job");
    service
        .fill(&caller, &job.id, fill_details("Jane Doe"))
        .expect("fill");
    service.soft_delete(&caller, &job.id).expect("delete");

    let filled_view = service.list(&caller, JobView::Filled).expect("filled view");
    assert!(filled_view.is_empty());

    let deleted_view = service
        .list(&caller, JobView::Deleted)
        .expect("deleted view");
    assert_eq!(deleted_view.len(), 1);
    assert_eq!(deleted_view[0].status, JobStatus::Filled);
}

#[test]
fn listings_order_newest_first_with_insertion_order_ties() {
    let (store, service) = build_service();

    let older = seed_job(&store, "Older", at((2025, 9, 1), (9, 0, 0)));
    let tied_first = seed_job(&store, "Tied A", at((2025, 9, 2), (9, 0, 0)));
    let tied_second = seed_job(&store, "Tied B", at((2025, 9, 2), (9, 0, 0)));
    let newest = seed_job(&store, "Newest", at((2025, 9, 3), (9, 0, 0)));

    let listing = service
        .list(&admin(), JobView::All)
        .expect("listing")
        .into_iter()
        .map(|job| job.id)
        .collect::<Vec<_>>();

    assert_eq!(
        listing,
        vec![newest.id, tied_first.id, tied_second.id, older.id]
    );
}

#[test]
fn public_filter_matches_nothing_out_of_bounds() {
    let (store, _service) = build_service();
    let job = seed_job(&store, "Cook", at((2025, 9, 1), (9, 0, 0)));
    backdate_fill(&store, &job.id, "Jane Doe", at((2025, 9, 2), (9, 0, 0)));

    let public = JobFilter::public();
    for job in store.find(&JobFilter::default()).expect("all jobs") {
        assert_eq!(public.matches(&job), job.publicly_listable());
    }
}
