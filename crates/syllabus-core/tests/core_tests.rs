use std::path::Path;

use figment::Jail;

use syllabus_core::config::{
    resolve_with_base, Config, EmbeddingProvider, EmbeddingSettings, Settings,
};
use syllabus_core::types::{RetrievalResult, ScoredChunk};
use syllabus_core::Error;

#[test]
fn settings_default_when_no_files_present() {
    Jail::expect_with(|_jail| {
        let settings = Config::from_figment(Config::figment_for_env("dev"))
            .settings()
            .expect("settings");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.retrieval.top_k, 4);
        assert_eq!(settings.embedding.provider, EmbeddingProvider::Openai);
        assert!(!settings.corpus.cache);
        Ok(())
    });
}

#[test]
fn env_layer_overrides_toml_layers() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            "[retrieval]\ntop_k = 6\n[corpus]\npath = \"base.json\"\n",
        )?;
        jail.create_file(
            "config.test.toml",
            "[corpus]\npath = \"test.json\"\ncache = true\n",
        )?;
        jail.set_env("APP_RETRIEVAL__TOP_K", "2");
        jail.set_env("APP_EMBEDDING__PROVIDER", "fake");

        let config = Config::from_figment(Config::figment_for_env("test"));
        let settings = config.settings().expect("settings");
        assert_eq!(settings.retrieval.top_k, 2, "env beats toml");
        assert_eq!(settings.corpus.path, "test.json", "env-specific file beats base file");
        assert!(settings.corpus.cache);
        assert_eq!(settings.embedding.provider, EmbeddingProvider::Fake);

        let top_k: usize = config.get("retrieval.top_k").expect("get");
        assert_eq!(top_k, 2);
        Ok(())
    });
}

#[test]
fn zero_top_k_is_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[retrieval]\ntop_k = 0\n")?;
        assert!(Config::from_figment(Config::figment_for_env("dev")).settings().is_err());
        Ok(())
    });
}

#[test]
fn missing_credential_is_a_configuration_error() {
    Jail::expect_with(|_jail| {
        let settings = EmbeddingSettings {
            api_key_env: "SYLLABUS_TEST_UNSET_KEY".into(),
            ..Default::default()
        };
        let err = settings.resolve_api_key().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("SYLLABUS_TEST_UNSET_KEY"));
        Ok(())
    });
}

#[test]
fn credential_resolves_from_named_env_var() {
    Jail::expect_with(|jail| {
        jail.set_env("SYLLABUS_TEST_KEY", "sk-test");
        let settings = EmbeddingSettings {
            api_key_env: "SYLLABUS_TEST_KEY".into(),
            ..Default::default()
        };
        assert_eq!(settings.resolve_api_key().expect("key"), "sk-test");

        let inline = EmbeddingSettings {
            api_key: Some("sk-inline".into()),
            ..settings
        };
        assert_eq!(inline.resolve_api_key().expect("key"), "sk-inline");
        assert!(!format!("{inline:?}").contains("sk-inline"), "debug output redacts the key");
        Ok(())
    });
}

#[test]
fn relative_corpus_paths_resolve_against_base() {
    let base = Path::new("/srv/app");
    assert_eq!(resolve_with_base(base, "data/x.json"), Path::new("/srv/app/data/x.json"));
    assert_eq!(resolve_with_base(base, "/abs/x.json"), Path::new("/abs/x.json"));
}

#[test]
fn retrieval_result_serializes_with_wire_keys() {
    let result = RetrievalResult {
        top_chunks: vec![ScoredChunk {
            chunk_id: 3,
            text: "Late work loses 10%".into(),
            similarity: 0.5,
        }],
        context: "Late work loses 10%".into(),
        question: "late policy?".into(),
    };
    let v = serde_json::to_value(&result).expect("json");
    assert_eq!(v["topChunks"][0]["chunk_id"], 3);
    assert_eq!(v["topChunks"][0]["text"], "Late work loses 10%");
    assert_eq!(v["topChunks"][0]["similarity"], 0.5);
    assert_eq!(v["context"], "Late work loses 10%");
    assert_eq!(v["question"], "late policy?");
    assert!(v["topChunks"][0].get("embedding").is_none());
}
