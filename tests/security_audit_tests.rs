//! Security Audit Tests
//!
//! Tests for the properties callers rely on when obtext origin is
//! untrusted: tamper rejection, strict scheme pinning, no secrets in errors or
//! debug output, and isolation of the keyless testing schemes.

/// Single-byte tampering of authenticated obtext
mod tamper_rejection {
    use obtext::{generate_key_bytes, Encoding, Error, Format, ObCipher, Oboron, Scheme};

    const AUTHENTICATED: [Scheme; 4] = [Scheme::Ob31, Scheme::Ob31p, Scheme::Ob32, Scheme::Ob32p];

    #[test]
    fn test_every_envelope_byte_flip_rejected() {
        let key = generate_key_bytes(Scheme::Ob32p);
        for scheme in AUTHENTICATED {
            let cipher = ObCipher::new(Format::new(scheme, Encoding::Hex), key.as_slice()).unwrap();
            let bytes = hex::decode(cipher.enc("integrity matters").unwrap()).unwrap();
            for i in 0..bytes.len() {
                let mut tampered = bytes.clone();
                tampered[i] ^= 0x01;
                let result = cipher.dec(&hex::encode(&tampered));
                assert!(
                    matches!(result, Err(Error::AuthFailure) | Err(Error::Decode(_))),
                    "{} byte {} gave {:?}",
                    scheme,
                    i,
                    result
                );
            }
        }
    }

    #[test]
    fn test_truncation_rejected() {
        let key = generate_key_bytes(Scheme::Ob32p);
        for scheme in AUTHENTICATED {
            let cipher = ObCipher::new(Format::new(scheme, Encoding::Hex), key.as_slice()).unwrap();
            let obtext = cipher.enc("truncate").unwrap();
            for cut in (2..obtext.len()).step_by(2) {
                assert!(cipher.dec(&obtext[..obtext.len() - cut]).is_err(), "{}", scheme);
            }
        }
    }
}

/// Strict decode pins the scheme; non-strict decode stays within keyed schemes
mod scheme_pinning {
    use obtext::{dec_strict, enc, generate_key_bytes, Error, Ob, Oboron, Scheme};

    #[test]
    fn test_strict_cipher_refuses_weaker_obtext() {
        let key = generate_key_bytes(Scheme::Ob32p);
        let reader = Ob::new("ob32p:c32", key.as_slice()).unwrap();
        for weaker in ["ob00:c32", "ob01:c32", "ob21p:c32", "ob31:c32", "ob32:c32"] {
            let obtext = enc(weaker, key.as_slice(), "pinned").unwrap();
            assert!(matches!(reader.dec_strict(&obtext), Err(Error::Decode(_))), "{}", weaker);
            assert!(matches!(
                dec_strict("ob32p:c32", key.as_slice(), &obtext),
                Err(Error::Decode(_))
            ));
            assert_eq!(reader.dec(&obtext).unwrap(), "pinned", "{}", weaker);
        }
    }

    #[test]
    fn test_keyed_cipher_refuses_testing_obtext() {
        let key = generate_key_bytes(Scheme::Ob32p);
        let reader = Ob::new("ob32p:c32", key.as_slice()).unwrap();
        for testing in ["ob70:c32", "ob71:c32"] {
            let obtext = enc(testing, key.as_slice(), "plain").unwrap();
            assert!(matches!(reader.dec(&obtext), Err(Error::Decode(_))), "{}", testing);
        }
    }

    #[test]
    fn test_retagged_envelope_is_refused() {
        let key = generate_key_bytes(Scheme::Ob32);
        let reader = Ob::new("ob32:hex", key.as_slice()).unwrap();
        let mut bytes = hex::decode(reader.enc("retag").unwrap()).unwrap();
        // claim the blob is pass-through testing output
        bytes[0] = Scheme::Ob70.tag();
        assert!(matches!(reader.dec(&hex::encode(&bytes)), Err(Error::Decode(_))));
        // a keyed tag swap fails authentication or length checks
        bytes[0] = Scheme::Ob31.tag();
        assert!(reader.dec(&hex::encode(&bytes)).is_err());
    }
}

/// Secrets never appear in errors or debug output
mod secret_hygiene {
    use obtext::{
        autodec, dec, generate_key, Candidate, Error, Key, Ob, ObCipher, ObMulti, Oboron, Scheme,
    };

    #[test]
    fn test_debug_output_redacts_keys() {
        let hex_key = generate_key(Scheme::Ob32p);
        let key = Key::from_hex(&hex_key).unwrap();
        let debugs = [
            format!("{:?}", key),
            format!("{:?}", ObCipher::ob32p(&key, None).unwrap()),
            format!("{:?}", Ob::new("ob31:b64", &key).unwrap()),
            format!("{:?}", ObMulti::new(vec![Candidate::new("ob32:c32", &key).unwrap()]).unwrap()),
            format!("{:?}", Candidate::new("ob01:hex", &key).unwrap()),
        ];
        for debug in debugs {
            assert!(!debug.contains(&hex_key[..16]), "{}", debug);
            assert!(debug.contains("REDACTED"), "{}", debug);
        }
    }

    #[test]
    fn test_errors_carry_no_secrets() {
        let key = Key::from_hex(&generate_key(Scheme::Ob32)).unwrap();
        let other = Key::from_hex(&generate_key(Scheme::Ob32)).unwrap();
        let obtext = ObCipher::ob32(&key, None).unwrap().enc("top secret plaintext").unwrap();

        let errors = [
            dec("ob32:c32", &other, &obtext).unwrap_err(),
            dec("ob31:c32", &key, &obtext[..obtext.len() - 3]).unwrap_err(),
            autodec(&[Candidate::new("ob32:c32", &other).unwrap()], &obtext).unwrap_err(),
            ObCipher::ob32(&[1u8; 10][..], None).unwrap_err(),
        ];
        for err in errors {
            let message = err.to_string();
            assert!(!message.contains("top secret"));
            assert!(!message.contains(&key.to_hex()[..16]));
            assert!(!message.contains(&other.to_hex()[..16]));
            assert!(!message.contains(&obtext));
        }
    }

    #[test]
    fn test_autodec_failure_is_uniform() {
        let key = Key::from_hex(&generate_key(Scheme::Ob32)).unwrap();
        let candidates = [Candidate::new("ob32:c32", &key).unwrap()];
        let wrong_key = ObCipher::ob32(Key::from_hex(&generate_key(Scheme::Ob32)).unwrap(), None)
            .unwrap()
            .enc("x")
            .unwrap();
        let wrong_scheme = ObCipher::ob31(&key, None).unwrap().enc("x").unwrap();

        for obtext in [wrong_key.as_str(), wrong_scheme.as_str(), "!!!", ""] {
            assert_eq!(autodec(&candidates, obtext), Err(Error::AutodecFailure));
        }
    }
}

/// Keyless variants are confined to the testing schemes
mod keyless_isolation {
    use obtext::{autodec_any, dec_keyless, enc_keyless, Error, Format, Key, Scheme};

    #[test]
    fn test_keyless_refuses_every_keyed_format() {
        for format in Format::all().filter(|f| !f.scheme().is_testing()) {
            assert!(matches!(enc_keyless(format, "x"), Err(Error::Config(_))), "{}", format);
            assert!(matches!(dec_keyless(format, "x"), Err(Error::Config(_))), "{}", format);
        }
    }

    #[test]
    fn test_secure_autodec_never_selects_testing_schemes() {
        let obtext = enc_keyless("ob70:b64", "visible").unwrap();
        assert_eq!(autodec_any(&[Key::testing()], &obtext), Err(Error::AutodecFailure));
    }

    #[test]
    fn test_default_selection_is_secure() {
        assert!(!Scheme::default().is_testing());
        assert!(Scheme::default().is_authenticated());
        assert!(!Format::default().scheme().is_testing());
    }
}
