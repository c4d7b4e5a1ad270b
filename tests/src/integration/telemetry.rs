//! # Telemetry Flows
//!
//! Controller operations show up in the Prometheus registry by name and
//! outcome.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;

    use keyvault_telemetry::{encode_metrics, register_metrics, KEYRING_OPERATIONS, SIGNATURES};
    use kv_01_keyring_controller::{ImportStrategy, KeyringApi, MessageParams};

    fn operation_count(operation: &str, outcome: &str) -> f64 {
        KEYRING_OPERATIONS
            .with_label_values(&[operation, outcome])
            .get()
    }

    #[tokio::test]
    async fn test_operations_are_counted_by_outcome() {
        let controller = restored_controller().await;
        let ok_before = operation_count("import_account_with_strategy", "ok");
        let rejected_before = operation_count("import_account_with_strategy", "validation");

        controller
            .import_account_with_strategy(ImportStrategy::PrivateKey, &[COW_KEY.into()])
            .await
            .unwrap();
        assert!(controller
            .import_account_with_strategy(ImportStrategy::PrivateKey, &[])
            .await
            .is_err());

        assert!(operation_count("import_account_with_strategy", "ok") >= ok_before + 1.0);
        assert!(
            operation_count("import_account_with_strategy", "validation")
                >= rejected_before + 1.0
        );
    }

    #[tokio::test]
    async fn test_signatures_are_counted_and_exported() {
        // Registration fails if another test registered first, which is fine
        let _ = register_metrics();
        let controller = restored_controller().await;
        let before = SIGNATURES.with_label_values(&["personal"]).get();

        controller
            .sign_personal_message(&MessageParams {
                from: address(ABANDON_FIRST),
                data: "metrics".into(),
            })
            .await
            .unwrap();

        assert!(SIGNATURES.with_label_values(&["personal"]).get() >= before + 1.0);
        let text = encode_metrics().unwrap();
        assert!(text.contains("kv_signatures_total"));
        assert!(text.contains("kv_keyring_operations_total"));
    }
}
