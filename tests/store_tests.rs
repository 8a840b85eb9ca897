use uuid::Uuid;

use cadence_lite::model::job::status;
use cadence_lite::model::{JobFilter, JobUpdate, NewJob, NewMetadata, NewSchedule, NewWorker, ScheduleUpdate};
use cadence_lite::store::{MemoryStore, Page, Store};

fn fixture_schedule() -> NewSchedule {
    NewSchedule::new(Uuid::new_v4().to_string(), "snapshot", 30, 2)
}

#[test]
fn test_schedule_create_assigns_id_and_timestamps() {
    let store = MemoryStore::default();
    let schedule = store.schedule_create(fixture_schedule()).unwrap();
    assert_eq!(schedule.action, "snapshot");
    assert_eq!(schedule.minute, 30);
    assert_eq!(schedule.hour, 2);
    assert_eq!(schedule.created_at, schedule.updated_at);
    assert!(schedule.metadata.is_empty());
}

#[test]
fn test_schedule_create_explicit_id_collision() {
    let store = MemoryStore::default();
    let id = Uuid::new_v4();
    store
        .schedule_create(fixture_schedule().with_id(id))
        .unwrap();
    let err = store
        .schedule_create(fixture_schedule().with_id(id))
        .unwrap_err();
    assert!(err.is_duplicate());
}

#[test]
fn test_schedule_get_by_id() {
    let store = MemoryStore::default();
    let schedule = store.schedule_create(fixture_schedule()).unwrap();
    let fetched = store.schedule_get_by_id(schedule.id).unwrap();
    assert_eq!(fetched, schedule);
}

#[test]
fn test_schedule_get_by_id_not_found() {
    let store = MemoryStore::default();
    let err = store.schedule_get_by_id(Uuid::new_v4()).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_schedule_partial_update() {
    let store = MemoryStore::default();
    let schedule = store.schedule_create(fixture_schedule()).unwrap();

    let updated = store
        .schedule_update(
            schedule.id,
            ScheduleUpdate {
                hour: Some(3),
                ..Default::default()
            },
        )
        .unwrap();

    // Only the supplied field changes; updated_at is re-stamped.
    assert_eq!(updated.hour, 3);
    assert_eq!(updated.minute, schedule.minute);
    assert_eq!(updated.tenant_id, schedule.tenant_id);
    assert_eq!(updated.action, schedule.action);
    assert_eq!(updated.created_at, schedule.created_at);
    assert!(updated.updated_at > schedule.updated_at);
}

#[test]
fn test_schedule_update_not_found() {
    let store = MemoryStore::default();
    let err = store
        .schedule_update(Uuid::new_v4(), ScheduleUpdate::default())
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_schedule_delete() {
    let store = MemoryStore::default();
    let schedule = store.schedule_create(fixture_schedule()).unwrap();
    store.schedule_delete(schedule.id).unwrap();
    assert!(store.schedule_get_by_id(schedule.id).unwrap_err().is_not_found());
    assert!(store.schedule_delete(schedule.id).unwrap_err().is_not_found());
}

#[test]
fn test_schedule_metadata_roundtrip() {
    let store = MemoryStore::default();
    let schedule = store.schedule_create(fixture_schedule()).unwrap();

    let meta = store
        .schedule_meta_create(schedule.id, NewMetadata::new("instance_id", "my_instance"))
        .unwrap();
    assert_eq!(meta.key, "instance_id");
    assert_eq!(meta.value, "my_instance");

    let fetched = store.schedule_meta_get(schedule.id, "instance_id").unwrap();
    assert_eq!(fetched, meta);

    let all = store.schedule_meta_get_all(schedule.id).unwrap();
    assert_eq!(all, vec![meta]);

    let updated = store
        .schedule_meta_update(schedule.id, "instance_id", "other_instance")
        .unwrap();
    assert_eq!(updated.value, "other_instance");

    store.schedule_meta_delete(schedule.id, "instance_id").unwrap();
    assert!(store.schedule_meta_get_all(schedule.id).unwrap().is_empty());
}

#[test]
fn test_schedule_metadata_key_uniqueness() {
    let store = MemoryStore::default();
    let schedule = store.schedule_create(fixture_schedule()).unwrap();
    store
        .schedule_meta_create(schedule.id, NewMetadata::new("key1", "value1"))
        .unwrap();
    let err = store
        .schedule_meta_create(schedule.id, NewMetadata::new("key1", "value2"))
        .unwrap_err();
    assert!(err.is_duplicate());
}

#[test]
fn test_schedule_metadata_missing_parent_and_missing_key() {
    let store = MemoryStore::default();
    let schedule = store.schedule_create(fixture_schedule()).unwrap();

    // Missing parent and missing key surface identically as NotFound.
    assert!(store
        .schedule_meta_get(Uuid::new_v4(), "key1")
        .unwrap_err()
        .is_not_found());
    assert!(store
        .schedule_meta_get(schedule.id, "key1")
        .unwrap_err()
        .is_not_found());
    assert!(store
        .schedule_meta_update(Uuid::new_v4(), "key1", "v")
        .unwrap_err()
        .is_not_found());
    assert!(store
        .schedule_meta_update(schedule.id, "key1", "v")
        .unwrap_err()
        .is_not_found());
    assert!(store
        .schedule_meta_delete(schedule.id, "key1")
        .unwrap_err()
        .is_not_found());
}

#[test]
fn test_schedule_metadata_get_all_missing_parent_is_empty() {
    let store = MemoryStore::default();
    assert!(store.schedule_meta_get_all(Uuid::new_v4()).unwrap().is_empty());
}

#[test]
fn test_schedule_create_with_metadata_duplicate_key_fails_whole_create() {
    let store = MemoryStore::default();
    let err = store
        .schedule_create(
            fixture_schedule()
                .with_metadata("key1", "a")
                .with_metadata("key1", "b"),
        )
        .unwrap_err();
    assert!(err.is_duplicate());
    assert!(store
        .schedule_get_all(&Default::default(), &Page::all())
        .unwrap()
        .is_empty());
}

#[test]
fn test_worker_crud() {
    let store = MemoryStore::default();
    let worker = store.worker_create(NewWorker::new("i.am.cowman")).unwrap();
    assert_eq!(worker.host, "i.am.cowman");

    let fetched = store.worker_get_by_id(worker.id).unwrap();
    assert_eq!(fetched, worker);

    let all = store.worker_get_all(&Page::all()).unwrap();
    assert_eq!(all, vec![worker.clone()]);

    store.worker_delete(worker.id).unwrap();
    assert!(store.worker_get_by_id(worker.id).unwrap_err().is_not_found());
    assert!(store.worker_delete(worker.id).unwrap_err().is_not_found());
}

#[test]
fn test_job_create_defaults() {
    let store = MemoryStore::default();
    let job = store
        .job_create(NewJob::default().with_action("snapshot"))
        .unwrap();
    assert_eq!(job.status, status::QUEUED);
    assert_eq!(job.retry_count, 0);
    assert!(job.worker_id.is_none());
    assert!(job.schedule_id.is_none());
    assert!(job.metadata.is_empty());
}

#[test]
fn test_job_create_inherits_from_schedule() {
    let store = MemoryStore::default();
    let schedule = store
        .schedule_create(fixture_schedule().with_metadata("instance_id", "my_instance"))
        .unwrap();

    let job = store.job_create(NewJob::from_schedule(schedule.id)).unwrap();
    assert_eq!(job.schedule_id, Some(schedule.id));
    assert_eq!(job.tenant_id.as_deref(), Some(schedule.tenant_id.as_str()));
    assert_eq!(job.action, schedule.action);
    assert_eq!(job.status, status::QUEUED);
    assert_eq!(job.metadata.len(), 1);
    assert_eq!(job.metadata[0].key, "instance_id");
    assert_eq!(job.metadata[0].value, "my_instance");
    // Snapshot, not a live link: the copy has its own identity.
    assert_ne!(job.metadata[0].id, schedule.metadata[0].id);
}

#[test]
fn test_job_metadata_survives_schedule_delete() {
    let store = MemoryStore::default();
    let schedule = store
        .schedule_create(fixture_schedule().with_metadata("instance_id", "my_instance"))
        .unwrap();
    let job = store.job_create(NewJob::from_schedule(schedule.id)).unwrap();

    store.schedule_delete(schedule.id).unwrap();

    let fetched = store.job_get_by_id(job.id).unwrap();
    assert_eq!(fetched.schedule_id, Some(schedule.id));
    assert_eq!(fetched.metadata.len(), 1);
}

#[test]
fn test_job_create_dangling_schedule_id() {
    let store = MemoryStore::default();
    let dangling = Uuid::new_v4();
    let job = store
        .job_create(NewJob::from_schedule(dangling).with_action("snapshot"))
        .unwrap();
    assert_eq!(job.schedule_id, Some(dangling));
    assert!(job.tenant_id.is_none());
}

#[test]
fn test_job_create_requires_some_action() {
    let store = MemoryStore::default();
    let err = store.job_create(NewJob::default()).unwrap_err();
    assert!(err.is_bad_request());
}

#[test]
fn test_job_create_explicit_metadata_wins_over_inherited() {
    let store = MemoryStore::default();
    let schedule = store
        .schedule_create(fixture_schedule().with_metadata("instance_id", "from_schedule"))
        .unwrap();
    let job = store
        .job_create(NewJob::from_schedule(schedule.id).with_metadata("instance_id", "explicit"))
        .unwrap();
    assert_eq!(job.metadata.len(), 1);
    assert_eq!(job.metadata[0].value, "explicit");
}

#[test]
fn test_job_partial_update() {
    let store = MemoryStore::default();
    let job = store
        .job_create(NewJob::default().with_action("snapshot"))
        .unwrap();

    let updated = store
        .job_update(
            job.id,
            JobUpdate {
                status: Some(status::ERROR.to_string()),
                retry_count: Some(2),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.status, status::ERROR);
    assert_eq!(updated.retry_count, 2);
    assert_eq!(updated.action, job.action);
    assert_eq!(updated.schedule_id, job.schedule_id);
}

#[test]
fn test_job_update_clears_worker_binding() {
    let store = MemoryStore::default();
    let worker = store.worker_create(NewWorker::new("host")).unwrap();
    store
        .job_create(NewJob::default().with_action("snapshot"))
        .unwrap();
    let claimed = store.claim_next_job("snapshot", worker.id).unwrap();

    let updated = store
        .job_update(
            claimed.id,
            JobUpdate {
                worker_id: Some(None),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(updated.worker_id.is_none());
}

#[test]
fn test_job_delete() {
    let store = MemoryStore::default();
    let job = store
        .job_create(NewJob::default().with_action("snapshot"))
        .unwrap();
    store.job_delete(job.id).unwrap();
    assert!(store.job_get_by_id(job.id).unwrap_err().is_not_found());
    assert!(store.job_delete(job.id).unwrap_err().is_not_found());
}

#[test]
fn test_job_metadata_operations() {
    let store = MemoryStore::default();
    let job = store
        .job_create(NewJob::default().with_action("snapshot"))
        .unwrap();

    store
        .job_meta_create(job.id, NewMetadata::new("key1", "value1"))
        .unwrap();
    let err = store
        .job_meta_create(job.id, NewMetadata::new("key1", "value1"))
        .unwrap_err();
    assert!(err.is_duplicate());

    assert_eq!(store.job_meta_get(job.id, "key1").unwrap().value, "value1");
    assert_eq!(
        store.job_meta_update(job.id, "key1", "value2").unwrap().value,
        "value2"
    );
    assert_eq!(store.job_meta_get_all(job.id).unwrap().len(), 1);
    store.job_meta_delete(job.id, "key1").unwrap();
    assert!(store.job_meta_get(job.id, "key1").unwrap_err().is_not_found());
}

#[test]
fn test_job_filters() {
    let store = MemoryStore::default();
    let schedule = store.schedule_create(fixture_schedule()).unwrap();
    store.job_create(NewJob::from_schedule(schedule.id)).unwrap();
    store
        .job_create(NewJob::default().with_action("dummy").with_status(status::ERROR))
        .unwrap();

    let by_schedule = store
        .job_get_all(
            &JobFilter {
                schedule_id: Some(schedule.id),
                ..Default::default()
            },
            &Page::all(),
        )
        .unwrap();
    assert_eq!(by_schedule.len(), 1);

    let by_status = store
        .job_get_all(
            &JobFilter {
                status: Some(status::ERROR.to_string()),
                ..Default::default()
            },
            &Page::all(),
        )
        .unwrap();
    assert_eq!(by_status.len(), 1);
    assert_eq!(by_status[0].action, "dummy");
}

#[test]
fn test_reset_clears_everything() {
    let store = MemoryStore::default();
    store.schedule_create(fixture_schedule()).unwrap();
    store.worker_create(NewWorker::new("host")).unwrap();
    store
        .job_create(NewJob::default().with_action("snapshot"))
        .unwrap();

    store.reset();

    assert!(store
        .schedule_get_all(&Default::default(), &Page::all())
        .unwrap()
        .is_empty());
    assert!(store.worker_get_all(&Page::all()).unwrap().is_empty());
    assert!(store
        .job_get_all(&Default::default(), &Page::all())
        .unwrap()
        .is_empty());
}

#[test]
fn test_records_serialize_with_nested_metadata() {
    let store = MemoryStore::default();
    let schedule = store
        .schedule_create(fixture_schedule().with_metadata("instance_id", "my_instance"))
        .unwrap();
    let value = serde_json::to_value(&schedule).unwrap();
    assert_eq!(value["action"], "snapshot");
    assert_eq!(value["metadata"][0]["key"], "instance_id");
    assert!(value["created_at"].is_string());
}
