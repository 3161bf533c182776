use bigguy_math::{BigGuy, BigGuyError};

// Prints a digest of the limbs produced by a fixed accumulation so runs on
// different platforms can be compared by eye.
fn main() -> Result<(), BigGuyError> {
    let vals: Vec<f64> = vec![
        0.0, 1.0, -1.0, 0.5, -0.5, 0.25, -0.25, 0.75, -0.75, 1.25, -1.25, 127.0, -128.0, 0.1, -1e-9,
    ];
    let mut acc = BigGuy::ZERO;
    let mut bytes = Vec::with_capacity(vals.len() * 16);
    for (i, &d) in vals.iter().enumerate() {
        acc.add_mult(BigGuy::from_f64(d)?, i as i64 + 1)?;
        for limb in acc.limbs() {
            bytes.extend_from_slice(&limb.to_be_bytes());
        }
    }
    println!("BIGGUY_SUM {:?} ({})", acc, acc);
    println!("BIGGUY_HASH {}", sha256(&bytes));
    Ok(())
}

fn sha256(data: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(data);
    let out = hasher.finalize();
    hex::encode(out)
}
