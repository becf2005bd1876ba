use anyhow::Context;
use sea_orm::Set;
use uuid::Uuid;

use crate::contract::model::{
    Coverage, Dependant, Gender, MedicalAidCover, MedicalAidName, Patient, PaymentType,
};
use crate::infra::storage::entity::{dependant, patient};

/// Contract patient -> patient row. Medical-aid columns stay NULL for CASH.
pub fn patient_to_active(p: &Patient) -> patient::ActiveModel {
    let cover = p.coverage.medical_aid();
    patient::ActiveModel {
        id: Set(p.id),
        full_name: Set(p.full_name.clone()),
        id_number: Set(p.id_number.clone()),
        payment_type: Set(p.coverage.payment_type().as_str().to_string()),
        home_address: Set(cover.map(|c| c.home_address.clone())),
        medical_aid_holder_full_name: Set(cover.map(|c| c.holder_full_name.clone())),
        medical_aid_holder_id_number: Set(cover.map(|c| c.holder_id_number.clone())),
        medical_aid_holder_phone: Set(cover.map(|c| c.holder_phone.clone())),
        medical_aid_holder_second_phone: Set(cover.and_then(|c| c.holder_second_phone.clone())),
        medical_aid_name: Set(cover.and_then(|c| c.scheme).map(|s| s.as_str().to_string())),
        medical_aid_number: Set(cover.map(|c| c.number.clone())),
        medical_aid_plan: Set(cover.and_then(|c| c.plan.clone())),
        created_at: Set(p.created_at),
    }
}

pub fn dependant_to_active(patient_id: Uuid, position: usize, d: &Dependant) -> dependant::ActiveModel {
    dependant::ActiveModel {
        id: Set(Uuid::new_v4()),
        patient_id: Set(patient_id),
        position: Set(position as i32),
        full_name: Set(d.full_name.clone()),
        gender: Set(d.gender.map(|g| g.as_str().to_string())),
        date_of_birth: Set(d.date_of_birth.clone()),
    }
}

/// Rows -> contract patient. `dependants` must already be in position order.
pub fn rows_to_contract(
    row: patient::Model,
    dependants: Vec<dependant::Model>,
) -> anyhow::Result<Patient> {
    let payment_type: PaymentType = row
        .payment_type
        .parse()
        .with_context(|| format!("patient {}", row.id))?;

    let coverage = match payment_type {
        PaymentType::Cash => Coverage::Cash,
        PaymentType::MedicalAid => Coverage::MedicalAid(MedicalAidCover {
            home_address: row.home_address.unwrap_or_default(),
            holder_full_name: row.medical_aid_holder_full_name.unwrap_or_default(),
            holder_id_number: row.medical_aid_holder_id_number.unwrap_or_default(),
            holder_phone: row.medical_aid_holder_phone.unwrap_or_default(),
            holder_second_phone: row.medical_aid_holder_second_phone,
            scheme: row
                .medical_aid_name
                .as_deref()
                .map(str::parse::<MedicalAidName>)
                .transpose()
                .with_context(|| format!("patient {}", row.id))?,
            number: row.medical_aid_number.unwrap_or_default(),
            plan: row.medical_aid_plan,
            dependants: dependants
                .into_iter()
                .map(dependant_to_contract)
                .collect::<anyhow::Result<_>>()?,
        }),
    };

    Ok(Patient {
        id: row.id,
        full_name: row.full_name,
        id_number: row.id_number,
        coverage,
        created_at: row.created_at,
    })
}

fn dependant_to_contract(row: dependant::Model) -> anyhow::Result<Dependant> {
    let gender = row
        .gender
        .as_deref()
        .map(str::parse::<Gender>)
        .transpose()
        .with_context(|| format!("dependant {}", row.id))?;
    Ok(Dependant {
        full_name: row.full_name,
        gender,
        date_of_birth: row.date_of_birth,
    })
}
