use crate::infra::{
    default_scoring_engine, InMemoryAuditSink, InMemoryEvaluationRepository, RoleAccessPolicy,
    SeededDossierDirectory,
};
use chrono::Utc;
use clap::Args;
use riskeval::error::AppError;
use riskeval::workflows::dossier::evaluations::{
    ActorContext, DraftUpdate, EvaluationService, EvaluationType, FactorId, FactorUpdate, Role,
};
use riskeval::workflows::dossier::{DossierDirectory, DossierId};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Dossier to evaluate (defaults to a seeded sample dossier)
    #[arg(long)]
    pub(crate) dossier: Option<String>,
    /// Skip the rejection showcase on the second evaluation version
    #[arg(long)]
    pub(crate) skip_rejection: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        dossier,
        skip_rejection,
    } = args;

    let dossier_id = DossierId(dossier.unwrap_or_else(|| "DSR-0042".to_string()));

    let repository = Arc::new(InMemoryEvaluationRepository::default());
    let audit = Arc::new(InMemoryAuditSink::default());
    let directory = SeededDossierDirectory::with_sample_dossiers();
    let service = EvaluationService::new(
        repository,
        audit.clone(),
        Arc::new(RoleAccessPolicy),
        default_scoring_engine(),
    );

    let analyst = ActorContext {
        user_id: "maria.alvarez".to_string(),
        display_name: "María Álvarez".to_string(),
        role: Role::Analyst,
    };
    let officer = ActorContext {
        user_id: "jorge.paredes".to_string(),
        display_name: "Jorge Paredes".to_string(),
        role: Role::ComplianceOfficer,
    };

    println!("Dossier risk evaluation demo");
    match directory.lookup(&dossier_id) {
        Ok(Some(info)) => println!(
            "Dossier {}: {} ({})",
            dossier_id.0,
            info.display_name,
            info.subject_type.label()
        ),
        Ok(None) => println!("Dossier {}: not present in the reference directory", dossier_id.0),
        Err(err) => println!("Dossier directory unavailable: {err}"),
    }

    let draft = match service.start_evaluation(
        &analyst,
        dossier_id.clone(),
        EvaluationType::Initial,
        Utc::now(),
    ) {
        Ok(draft) => draft,
        Err(err) => {
            println!("  Could not open an evaluation: {err}");
            return Ok(());
        }
    };
    println!(
        "- Opened evaluation {} (version {}) as {}",
        draft.evaluation_id.0, draft.version, analyst.display_name
    );

    let mut update = DraftUpdate {
        factors: vec![
            FactorUpdate {
                factor_id: FactorId::Producto,
                weight: 2,
                observation: String::new(),
            },
            FactorUpdate {
                factor_id: FactorId::Canal,
                weight: 3,
                observation: String::new(),
            },
            FactorUpdate {
                factor_id: FactorId::Pep,
                weight: 5,
                observation: String::new(),
            },
        ],
        comments: Some("Evaluación inicial del expediente".to_string()),
    };
    let scored = match service.save_draft(&analyst, &draft.evaluation_id, update.clone(), Utc::now())
    {
        Ok(scored) => scored,
        Err(err) => {
            println!("  Draft could not be saved: {err}");
            return Ok(());
        }
    };
    println!(
        "- Saved draft: total {} / {} -> preliminary level {}",
        scored.total_score,
        scored.status_view().max_possible_score,
        scored.final_risk_level.label()
    );

    match service.submit(&analyst, &draft.evaluation_id, Utc::now()) {
        Ok(_) => println!("- Submission unexpectedly passed"),
        Err(err) => println!("- Submission blocked: {err}"),
    }

    update.factors[2].observation = "Cargo público declarado; debida diligencia ampliada".to_string();
    if let Err(err) = service.save_draft(&analyst, &draft.evaluation_id, update, Utc::now()) {
        println!("  Draft could not be saved: {err}");
        return Ok(());
    }

    let submitted = match service.submit(&analyst, &draft.evaluation_id, Utc::now()) {
        Ok(submitted) => submitted,
        Err(err) => {
            println!("  Submission failed: {err}");
            return Ok(());
        }
    };
    println!(
        "- Submitted for approval with level {}",
        submitted.final_risk_level.label()
    );

    let approved = match service.approve(&officer, &draft.evaluation_id, Utc::now()) {
        Ok(approved) => approved,
        Err(err) => {
            println!("  Approval failed: {err}");
            return Ok(());
        }
    };
    println!(
        "- Approved by {} at {}",
        approved.approved_by.as_deref().unwrap_or("unknown"),
        approved
            .approved_at
            .map(|at| at.to_rfc3339())
            .unwrap_or_default()
    );

    match serde_json::to_string_pretty(&approved.status_view()) {
        Ok(json) => println!("  Final record:\n{json}"),
        Err(err) => println!("  Final record unavailable: {err}"),
    }

    if !skip_rejection {
        println!("\nRe-assessment and rejection showcase");
        let second = match service.start_evaluation(
            &analyst,
            dossier_id.clone(),
            EvaluationType::Periodic,
            Utc::now(),
        ) {
            Ok(second) => second,
            Err(err) => {
                println!("  Could not open the re-assessment: {err}");
                return Ok(());
            }
        };
        println!(
            "- Opened evaluation {} (version {})",
            second.evaluation_id.0, second.version
        );

        if let Err(err) = service.submit(&analyst, &second.evaluation_id, Utc::now()) {
            println!("  Submission failed: {err}");
            return Ok(());
        }
        match service.reject(
            &officer,
            &second.evaluation_id,
            "Documentación insuficiente",
            Utc::now(),
        ) {
            Ok(rejected) => println!(
                "- Rejected with reason: {}",
                rejected.rejection_reason.as_deref().unwrap_or_default()
            ),
            Err(err) => println!("  Rejection failed: {err}"),
        }
    }

    match service.dossier_history(&dossier_id) {
        Ok(history) => {
            println!("\nEvaluation history for {}", dossier_id.0);
            for summary in history {
                println!(
                    "- v{} [{}] {} -> {} (total {})",
                    summary.version,
                    summary.evaluation_type.label(),
                    summary.evaluator_name,
                    summary.status.label(),
                    summary.total_score
                );
            }
        }
        Err(err) => println!("History unavailable: {err}"),
    }

    println!("\nAudit trail");
    for event in audit.events() {
        println!(
            "- {} {} -> {} by {}{}",
            event.evaluation_id.0,
            event.from_status.label(),
            event.to_status.label(),
            event.actor_id,
            event
                .justification
                .map(|justification| format!(" ({justification})"))
                .unwrap_or_default()
        );
    }

    Ok(())
}
