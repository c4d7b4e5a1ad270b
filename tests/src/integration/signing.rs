//! # Signing Flows
//!
//! Every signing entry point, checked against independent hashing in
//! `shared-crypto`: the returned signature must recover to the account that
//! was asked to sign.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use serde_json::json;

    use kv_01_keyring_controller::{
        ErrorKind, ImportStrategy, KeyringApi, MessageParams, TypedDataVersion,
        TypedMessageParams, TYPED_MESSAGE_PREFIX,
    };
    use shared_crypto::{
        encrypt_keystore, hash_typed_data, keccak256, personal_message_hash, recover_address,
        Eip1559Transaction, Eip712Version, KdfParams, PrivateKey, RecoverableSignature,
        TransactionRequest, TypedData,
    };
    use shared_types::{decode_hex, encode_hex_prefixed};

    fn parse_signature(hex_sig: &str) -> RecoverableSignature {
        RecoverableSignature::from_bytes(&decode_hex(hex_sig).unwrap()).unwrap()
    }

    fn permit() -> serde_json::Value {
        json!({
            "types": {
                "EIP712Domain": [
                    { "name": "name", "type": "string" },
                    { "name": "chainId", "type": "uint256" }
                ],
                "Permit": [
                    { "name": "owner", "type": "address" },
                    { "name": "spenders", "type": "address[]" },
                    { "name": "amount", "type": "uint256" }
                ]
            },
            "primaryType": "Permit",
            "domain": { "name": "Token", "chainId": 5 },
            "message": {
                "owner": ABANDON_FIRST,
                "spenders": [COW_ADDRESS, "0x0000000000000000000000000000000000000001"],
                "amount": "1000000000000000000"
            }
        })
    }

    /// Every account the controller holds can sign, whatever keyring it lives in
    #[tokio::test]
    async fn test_all_keyring_kinds_sign_messages() {
        let controller = restored_controller().await;
        let second_hd = *controller.add_new_account().await.unwrap().keyrings[0]
            .accounts
            .last()
            .unwrap();

        let key = PrivateKey::from_hex(COW_KEY).unwrap();
        let json = encrypt_keystore(&key, "json-pass", KdfParams::scrypt(4)).unwrap();
        controller
            .import_account_with_strategy(ImportStrategy::Json, &[json, "json-pass".into()])
            .await
            .unwrap();

        let message = "Sign in to example.org";
        let digest = personal_message_hash(message.as_bytes());
        for account in [address(ABANDON_FIRST), second_hd, address(COW_ADDRESS)] {
            let signature = controller
                .sign_personal_message(&MessageParams {
                    from: account,
                    data: message.into(),
                })
                .await
                .unwrap();
            assert_eq!(
                recover_address(&digest, &parse_signature(&signature)).unwrap(),
                account
            );
        }
    }

    #[tokio::test]
    async fn test_raw_digest_signing() {
        let controller = restored_controller().await;
        let digest = keccak256(b"arbitrary payload");
        let signature = controller
            .sign_message(&MessageParams {
                from: address(ABANDON_FIRST),
                data: encode_hex_prefixed(digest),
            })
            .await
            .unwrap();

        let parsed = parse_signature(&signature);
        assert!(parsed.v == 27 || parsed.v == 28);
        assert_eq!(
            recover_address(&digest, &parsed).unwrap(),
            address(ABANDON_FIRST)
        );
    }

    #[tokio::test]
    async fn test_typed_data_v4_with_arrays() {
        let controller = restored_controller().await;
        let params = TypedMessageParams {
            from: address(ABANDON_FIRST),
            data: permit(),
        };

        let signature = controller
            .sign_typed_message(&params, TypedDataVersion::V4)
            .await
            .unwrap();

        let typed = TypedData::from_value(&permit()).unwrap();
        let digest = hash_typed_data(&typed, Eip712Version::V4).unwrap();
        assert_eq!(
            recover_address(&digest, &parse_signature(&signature)).unwrap(),
            address(ABANDON_FIRST)
        );

        // V3 cannot encode the array member
        let err = controller
            .sign_typed_message(&params, TypedDataVersion::V3)
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with(TYPED_MESSAGE_PREFIX));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_typed_data_accepts_json_string() {
        let controller = restored_controller().await;
        let as_object = controller
            .sign_typed_message(
                &TypedMessageParams {
                    from: address(ABANDON_FIRST),
                    data: permit(),
                },
                TypedDataVersion::V4,
            )
            .await
            .unwrap();
        let as_string = controller
            .sign_typed_message(
                &TypedMessageParams {
                    from: address(ABANDON_FIRST),
                    data: json!(permit().to_string()),
                },
                TypedDataVersion::V4,
            )
            .await
            .unwrap();

        // RFC 6979 signatures are deterministic
        assert_eq!(as_object, as_string);
    }

    #[tokio::test]
    async fn test_eip1559_transaction() {
        let controller = restored_controller().await;
        let request = TransactionRequest::Eip1559(Eip1559Transaction {
            chain_id: 1,
            nonce: 7,
            max_priority_fee_per_gas: 1_000_000_000u64.into(),
            max_fee_per_gas: 30_000_000_000u64.into(),
            gas_limit: 21_000,
            to: Some(address(COW_ADDRESS)),
            value: 1_000_000_000_000_000u64.into(),
            ..Default::default()
        });

        let signed = controller
            .sign_transaction(&request, &address(ABANDON_FIRST))
            .await
            .unwrap();

        assert_eq!(signed.raw[0], 0x02);
        assert_eq!(signed.hash, keccak256(&signed.raw));
        assert!(signed.v <= 1);

        let signature = RecoverableSignature {
            r: signed.r,
            s: signed.s,
            v: 27 + signed.v as u8,
        };
        assert_eq!(
            recover_address(&request.signing_hash(), &signature).unwrap(),
            address(ABANDON_FIRST)
        );
    }

    #[tokio::test]
    async fn test_removed_account_can_no_longer_sign() {
        let controller = restored_controller().await;
        controller
            .import_account_with_strategy(ImportStrategy::PrivateKey, &[COW_KEY.into()])
            .await
            .unwrap();
        controller
            .remove_account(&address(COW_ADDRESS))
            .await
            .unwrap();

        let err = controller
            .sign_personal_message(&MessageParams {
                from: address(COW_ADDRESS),
                data: "hello".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
