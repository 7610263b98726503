// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// One use case per --mode. Each coordinates the data, ml and
// infra layers and returns a small summary to the CLI.
//
// Rules for this layer:
//   - No tensor math here (that's Layer 5)
//   - No argument parsing or printing (that's Layer 1)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// --mode=prep
pub mod prep_use_case;

// --mode=test
pub mod test_use_case;

// --mode=train
pub mod train_use_case;
