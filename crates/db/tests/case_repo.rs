use chrono::{Duration, NaiveDate};
use claimtrack_core::case_status::CaseStatus;
use claimtrack_core::status_engine::compute_status;
use claimtrack_core::references::ReferenceKind;
use claimtrack_core::types::DbId;
use claimtrack_db::models::case::{CaseFilter, CaseListParams, CreateCase, UpdateCase};
use claimtrack_db::models::equipment::CreateEquipment;
use claimtrack_db::models::reference::CreateReferenceItem;
use claimtrack_db::models::warranty_work::UpdateWarrantyWork;
use claimtrack_db::repositories::{CaseRepo, EquipmentRepo, ReferenceRepo, WarrantyWorkRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

struct Refs {
    regional_center_id: DbId,
    locomotive_model_id: DbId,
    fault_discovery_place_id: DbId,
    malfunction_id: DbId,
    repair_type_id: DbId,
    supplier_id: DbId,
    other_supplier_id: DbId,
    /// Unit with a supplier.
    unit_id: DbId,
    /// Part below `unit_id` with no supplier of its own.
    part_id: DbId,
    /// Equipment with no supplier anywhere above it.
    orphan_id: DbId,
    /// Equipment whose own supplier is `other_supplier_id`.
    other_unit_id: DbId,
}

async fn reference(pool: &PgPool, kind: ReferenceKind, name: &str) -> DbId {
    ReferenceRepo::create(pool, kind, &CreateReferenceItem { name: name.into() })
        .await
        .unwrap()
        .id
}

async fn equipment(
    pool: &PgPool,
    name: &str,
    parent_id: Option<DbId>,
    supplier_id: Option<DbId>,
) -> DbId {
    EquipmentRepo::create(
        pool,
        &CreateEquipment {
            name: name.into(),
            parent_id,
            supplier_id,
        },
    )
    .await
    .unwrap()
    .id
}

/// Summary rows are created in id order so ids 1..=14 exist for the
/// classification FKs.
async fn seed_summaries(pool: &PgPool) {
    for kind in [
        ReferenceKind::NotificationSummaries,
        ReferenceKind::ResponseSummaries,
        ReferenceKind::DecisionSummaries,
    ] {
        for i in 1..=14 {
            reference(pool, kind, &format!("summary {i:02}")).await;
        }
    }
}

async fn seed(pool: &PgPool) -> Refs {
    seed_summaries(pool).await;
    let supplier_id = reference(pool, ReferenceKind::Suppliers, "Поставщик А").await;
    let other_supplier_id = reference(pool, ReferenceKind::Suppliers, "Поставщик Б").await;
    let unit_id = equipment(pool, "Тяговый двигатель", None, Some(supplier_id)).await;
    let part_id = equipment(pool, "Якорь", Some(unit_id), None).await;
    Refs {
        regional_center_id: reference(pool, ReferenceKind::RegionalCenters, "Центр").await,
        locomotive_model_id: reference(pool, ReferenceKind::LocomotiveModels, "2ЭС6").await,
        fault_discovery_place_id: reference(pool, ReferenceKind::FaultDiscoveryPlaces, "Депо")
            .await,
        malfunction_id: reference(pool, ReferenceKind::Malfunctions, "Пробой").await,
        repair_type_id: reference(pool, ReferenceKind::RepairTypes, "ТР-1").await,
        supplier_id,
        other_supplier_id,
        unit_id,
        part_id,
        orphan_id: equipment(pool, "Прочее", None, None).await,
        other_unit_id: equipment(pool, "Компрессор", None, Some(other_supplier_id)).await,
    }
}

fn new_case(refs: &Refs, fault_date: NaiveDate) -> CreateCase {
    CreateCase {
        fault_date,
        section_mask: 1,
        locomotive_number: Some("0123".into()),
        mileage: Some(120_000),
        component_quantity: 1,
        element_quantity: None,
        component_serial_number_old: None,
        component_manufacture_date_old: None,
        element_serial_number_old: None,
        element_manufacture_date_old: None,
        component_serial_number_new: None,
        component_manufacture_date_new: None,
        element_serial_number_new: None,
        element_manufacture_date_new: None,
        notes: None,
        regional_center_id: refs.regional_center_id,
        locomotive_model_id: refs.locomotive_model_id,
        fault_discovery_place_id: refs.fault_discovery_place_id,
        component_equipment_id: refs.part_id,
        element_equipment_id: None,
        malfunction_id: refs.malfunction_id,
        repair_type_id: refs.repair_type_id,
        repair_performer_id: None,
        equipment_owner_id: None,
        destination_type_id: None,
        warranty_work: None,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn filter(params: CaseListParams) -> CaseFilter {
    CaseFilter::try_from(params).unwrap()
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_inserts_case_with_empty_warranty_work(pool: PgPool) {
    let refs = seed(&pool).await;
    let detail = CaseRepo::create(&pool, &new_case(&refs, date(2024, 5, 1)))
        .await
        .unwrap();

    assert_eq!(detail.case.status, CaseStatus::AwaitingNotification.as_label());
    let warranty = detail.warranty_work.expect("warranty work row");
    assert_eq!(warranty.case_id, detail.case.case.id);
    assert!(warranty.notification_summary_id.is_none());
    assert_eq!(detail.case.regional_center_name.as_deref(), Some("Центр"));
}

#[sqlx::test(migrations = "./migrations")]
async fn create_resolves_supplier_from_parent_equipment(pool: PgPool) {
    let refs = seed(&pool).await;
    let detail = CaseRepo::create(&pool, &new_case(&refs, date(2024, 5, 1)))
        .await
        .unwrap();

    assert_eq!(detail.case.case.supplier_id, Some(refs.supplier_id));
    assert_eq!(detail.case.supplier_name.as_deref(), Some("Поставщик А"));
}

#[sqlx::test(migrations = "./migrations")]
async fn create_normalizes_nested_warranty_work(pool: PgPool) {
    let refs = seed(&pool).await;
    let mut input = new_case(&refs, date(2024, 5, 1));
    input.warranty_work = Some(UpdateWarrantyWork {
        notification_number: Some("   ".into()),
        notification_summary_id: Some(2),
        response_summary_id: Some(0),
        notification_date: Some(claimtrack_db::current_date(&pool).await.unwrap()),
        ..Default::default()
    });

    let detail = CaseRepo::create(&pool, &input).await.unwrap();
    let warranty = detail.warranty_work.unwrap();
    assert!(warranty.notification_number.is_none());
    assert!(warranty.response_summary_id.is_none());
    assert_eq!(detail.case.status, CaseStatus::AwaitingSupplierResponse.as_label());
}

#[sqlx::test(migrations = "./migrations")]
async fn create_stores_text_trimmed(pool: PgPool) {
    let refs = seed(&pool).await;
    let mut input = new_case(&refs, date(2024, 5, 1));
    input.locomotive_number = Some(" 0456\t".into());
    input.notes = Some("\n".into());
    input.warranty_work = Some(UpdateWarrantyWork {
        notification_number: Some("  УВ-9 ".into()),
        claim_act_number: Some("\t".into()),
        ..Default::default()
    });

    let detail = CaseRepo::create(&pool, &input).await.unwrap();
    assert_eq!(detail.case.case.locomotive_number.as_deref(), Some("0456"));
    assert!(detail.case.case.notes.is_none());
    let warranty = detail.warranty_work.unwrap();
    assert_eq!(warranty.notification_number.as_deref(), Some("УВ-9"));
    assert!(warranty.claim_act_number.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn find_by_id_returns_none_for_missing_case(pool: PgPool) {
    assert!(CaseRepo::find_by_id(&pool, 999_999).await.unwrap().is_none());
    assert!(CaseRepo::find_detail(&pool, 999_999).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn warranty_update_moves_status_forward(pool: PgPool) {
    let refs = seed(&pool).await;
    let id = CaseRepo::create(&pool, &new_case(&refs, date(2024, 5, 1)))
        .await
        .unwrap()
        .case
        .case
        .id;

    let stale = claimtrack_db::current_date(&pool).await.unwrap() - Duration::days(10);
    let updated = WarrantyWorkRepo::update_by_case_id(
        &pool,
        id,
        &UpdateWarrantyWork {
            notification_summary_id: Some(3),
            notification_number: Some("УВ-17".into()),
            notification_date: Some(stale),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.notification_number.as_deref(), Some("УВ-17"));

    let case = CaseRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(case.status, CaseStatus::AwaitingClaimAct.as_label());

    WarrantyWorkRepo::update_by_case_id(
        &pool,
        id,
        &UpdateWarrantyWork {
            decision_summary_id: Some(9),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let case = CaseRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(case.status, CaseStatus::Completed.as_label());
}

#[sqlx::test(migrations = "./migrations")]
async fn warranty_update_keeps_unset_and_clears_sentinels(pool: PgPool) {
    let refs = seed(&pool).await;
    let mut input = new_case(&refs, date(2024, 5, 1));
    input.warranty_work = Some(UpdateWarrantyWork {
        notification_number: Some("УВ-1".into()),
        claim_act_number: Some("РА-1".into()),
        notification_summary_id: Some(5),
        ..Default::default()
    });
    let id = CaseRepo::create(&pool, &input).await.unwrap().case.case.id;

    let updated = WarrantyWorkRepo::update_by_case_id(
        &pool,
        id,
        &UpdateWarrantyWork {
            claim_act_number: Some(" ".into()),
            notification_summary_id: Some(0),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.notification_number.as_deref(), Some("УВ-1"));
    assert!(updated.claim_act_number.is_none());
    assert!(updated.notification_summary_id.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn tab_only_number_is_cleared_and_statuses_agree(pool: PgPool) {
    let refs = seed(&pool).await;
    let mut input = new_case(&refs, date(2024, 5, 1));
    input.warranty_work = Some(UpdateWarrantyWork {
        response_summary_id: Some(6),
        work_completion_act_number: Some("АВР-1".into()),
        ..Default::default()
    });
    let id = CaseRepo::create(&pool, &input).await.unwrap().case.case.id;

    let updated = WarrantyWorkRepo::update_by_case_id(
        &pool,
        id,
        &UpdateWarrantyWork {
            work_completion_act_number: Some("\t".into()),
            notification_number: Some(" УВ-3\r\n".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert!(updated.work_completion_act_number.is_none());
    assert_eq!(updated.notification_number.as_deref(), Some("УВ-3"));

    let today = claimtrack_db::current_date(&pool).await.unwrap();
    let in_process = compute_status(&updated.status_input(), today);
    let case = CaseRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(in_process, CaseStatus::AwaitingCompletionAct);
    assert_eq!(case.status, in_process.as_label());
}

#[sqlx::test(migrations = "./migrations")]
async fn case_patch_ignores_blank_text(pool: PgPool) {
    let refs = seed(&pool).await;
    let id = CaseRepo::create(&pool, &new_case(&refs, date(2024, 5, 1)))
        .await
        .unwrap()
        .case
        .case
        .id;

    let detail = CaseRepo::update(
        &pool,
        id,
        &UpdateCase {
            locomotive_number: Some(" \t".into()),
            notes: Some(" осмотр ".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(detail.case.case.locomotive_number.as_deref(), Some("0123"));
    assert_eq!(detail.case.case.notes.as_deref(), Some("осмотр"));
}

#[sqlx::test(migrations = "./migrations")]
async fn update_reresolves_supplier_and_applies_nested_warranty(pool: PgPool) {
    let refs = seed(&pool).await;
    let id = CaseRepo::create(&pool, &new_case(&refs, date(2024, 5, 1)))
        .await
        .unwrap()
        .case
        .case
        .id;

    let detail = CaseRepo::update(
        &pool,
        id,
        &UpdateCase {
            element_equipment_id: Some(refs.other_unit_id),
            notes: Some("замена".into()),
            warranty_work: Some(UpdateWarrantyWork {
                notification_summary_id: Some(4),
                ..Default::default()
            }),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(detail.case.case.supplier_id, Some(refs.other_supplier_id));
    assert_eq!(detail.case.case.notes.as_deref(), Some("замена"));
    assert_eq!(detail.case.status, CaseStatus::Completed.as_label());
    assert_eq!(
        detail.warranty_work.and_then(|w| w.notification_summary_id),
        Some(4)
    );

    // Component equipment wins over element equipment and may clear the supplier.
    let detail = CaseRepo::update(
        &pool,
        id,
        &UpdateCase {
            component_equipment_id: Some(refs.orphan_id),
            element_equipment_id: Some(refs.unit_id),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(detail.case.case.supplier_id, None);
}

#[sqlx::test(migrations = "./migrations")]
async fn update_without_equipment_keeps_supplier(pool: PgPool) {
    let refs = seed(&pool).await;
    let id = CaseRepo::create(&pool, &new_case(&refs, date(2024, 5, 1)))
        .await
        .unwrap()
        .case
        .case
        .id;

    let detail = CaseRepo::update(
        &pool,
        id,
        &UpdateCase {
            mileage: Some(130_000),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(detail.case.case.supplier_id, Some(refs.supplier_id));
    assert_eq!(detail.case.case.mileage, Some(130_000));
}

#[sqlx::test(migrations = "./migrations")]
async fn update_missing_case_returns_none(pool: PgPool) {
    let result = CaseRepo::update(&pool, 424_242, &UpdateCase::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn delete_cascades_to_warranty_work(pool: PgPool) {
    let refs = seed(&pool).await;
    let id = CaseRepo::create(&pool, &new_case(&refs, date(2024, 5, 1)))
        .await
        .unwrap()
        .case
        .case
        .id;

    assert!(CaseRepo::delete(&pool, id).await.unwrap());
    assert!(!CaseRepo::delete(&pool, id).await.unwrap());
    assert!(WarrantyWorkRepo::find_by_case_id(&pool, id)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn list_filters_by_status_and_ignores_zero_ids(pool: PgPool) {
    let refs = seed(&pool).await;
    let untouched = CaseRepo::create(&pool, &new_case(&refs, date(2024, 5, 1)))
        .await
        .unwrap()
        .case
        .case
        .id;

    let mut done = new_case(&refs, date(2024, 5, 2));
    done.warranty_work = Some(UpdateWarrantyWork {
        decision_summary_id: Some(9),
        ..Default::default()
    });
    let done = CaseRepo::create(&pool, &done).await.unwrap().case.case.id;

    let completed = CaseRepo::list_filtered(
        &pool,
        &filter(CaseListParams {
            status: Some(CaseStatus::Completed.as_label().into()),
            regional_center_id: Some("0".into()),
            locomotive_number: Some("  ".into()),
            ..Default::default()
        }),
    )
    .await
    .unwrap();
    let ids: Vec<DbId> = completed.iter().map(|c| c.case.id).collect();
    assert_eq!(ids, vec![done]);

    let both = CaseRepo::list_filtered(
        &pool,
        &filter(CaseListParams {
            status: Some(format!(
                "{},{}",
                CaseStatus::Completed.as_label(),
                CaseStatus::AwaitingNotification.as_label()
            )),
            ..Default::default()
        }),
    )
    .await
    .unwrap();
    // Newest first.
    let ids: Vec<DbId> = both.iter().map(|c| c.case.id).collect();
    assert_eq!(ids, vec![done, untouched]);
}

#[sqlx::test(migrations = "./migrations")]
async fn list_filters_by_date_range_and_warranty_fields(pool: PgPool) {
    let refs = seed(&pool).await;
    for day in 1..=5 {
        let mut input = new_case(&refs, date(2024, 3, day));
        input.warranty_work = Some(UpdateWarrantyWork {
            notification_number: Some(format!("УВ-{day}")),
            ..Default::default()
        });
        CaseRepo::create(&pool, &input).await.unwrap();
    }

    let in_range = filter(CaseListParams {
        date_from: Some(date(2024, 3, 2)),
        date_to: Some(date(2024, 3, 4)),
        ..Default::default()
    });
    let rows = CaseRepo::list_filtered(&pool, &in_range).await.unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(CaseRepo::count_filtered(&pool, &in_range).await.unwrap(), 3);

    let by_number = CaseRepo::list_filtered(
        &pool,
        &filter(CaseListParams {
            notification_number: Some("УВ-4".into()),
            ..Default::default()
        }),
    )
    .await
    .unwrap();
    assert_eq!(by_number.len(), 1);
    assert_eq!(by_number[0].case.fault_date, date(2024, 3, 4));

    let paged = CaseRepo::list_filtered(
        &pool,
        &filter(CaseListParams {
            skip: Some(1),
            limit: Some(2),
            ..Default::default()
        }),
    )
    .await
    .unwrap();
    assert_eq!(paged.len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn list_filters_by_supplier(pool: PgPool) {
    let refs = seed(&pool).await;
    CaseRepo::create(&pool, &new_case(&refs, date(2024, 5, 1)))
        .await
        .unwrap();
    let mut other = new_case(&refs, date(2024, 5, 1));
    other.component_equipment_id = refs.other_unit_id;
    CaseRepo::create(&pool, &other).await.unwrap();

    let rows = CaseRepo::list_filtered(
        &pool,
        &filter(CaseListParams {
            supplier_id: Some(refs.other_supplier_id.to_string()),
            ..Default::default()
        }),
    )
    .await
    .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].supplier_name.as_deref(), Some("Поставщик Б"));
}

#[sqlx::test(migrations = "./migrations")]
async fn list_filters_accept_value_lists(pool: PgPool) {
    let refs = seed(&pool).await;
    let mut ids = Vec::new();
    for (day, component) in [(1, refs.part_id), (2, refs.other_unit_id), (3, refs.orphan_id)] {
        let mut input = new_case(&refs, date(2024, 3, day));
        input.component_equipment_id = component;
        input.warranty_work = Some(UpdateWarrantyWork {
            notification_number: Some(format!("УВ-{day}")),
            ..Default::default()
        });
        ids.push(CaseRepo::create(&pool, &input).await.unwrap().case.case.id);
    }

    let by_suppliers = filter(CaseListParams {
        supplier_id: Some(format!("{},0,{}", refs.supplier_id, refs.other_supplier_id)),
        ..Default::default()
    });
    let rows = CaseRepo::list_filtered(&pool, &by_suppliers).await.unwrap();
    let found: Vec<DbId> = rows.iter().map(|c| c.case.id).collect();
    assert_eq!(found, vec![ids[1], ids[0]]);
    assert_eq!(CaseRepo::count_filtered(&pool, &by_suppliers).await.unwrap(), 2);

    let by_numbers = CaseRepo::list_filtered(
        &pool,
        &filter(CaseListParams {
            notification_number: Some("УВ-1, ,УВ-3".into()),
            component_equipment_id: Some(format!("{},{}", refs.part_id, refs.orphan_id)),
            ..Default::default()
        }),
    )
    .await
    .unwrap();
    let found: Vec<DbId> = by_numbers.iter().map(|c| c.case.id).collect();
    assert_eq!(found, vec![ids[2], ids[0]]);
}

#[sqlx::test(migrations = "./migrations")]
async fn status_date_is_the_database_date(pool: PgPool) {
    let expected: NaiveDate = sqlx::query_scalar("SELECT CURRENT_DATE")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(claimtrack_db::current_date(&pool).await.unwrap(), expected);
}
