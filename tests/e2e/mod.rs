// End-to-end tests for the Sentric Voice API
//
// Each test boots the real router on an ephemeral port with an in-process
// stub engine injected behind the VoiceEngine trait, so no inference sidecar
// or GPU is needed. Tests run in parallel; every test owns its own server
// and stub.

mod test_health;
