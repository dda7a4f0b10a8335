use crossload_bridge::{BridgeResult, ClassIdentifier, ClassNameAllocator};

use crate::error::CliError;

pub fn handle_names(identifier: &str, count: usize, namespace: &str) -> Result<(), CliError> {
    for name in allocation_sequence(identifier, count, namespace)? {
        println!("{}", name);
    }
    Ok(())
}

/// The first `count` names a fresh allocator hands out for `identifier`.
pub fn allocation_sequence(
    identifier: &str,
    count: usize,
    namespace: &str,
) -> BridgeResult<Vec<String>> {
    let names = ClassNameAllocator::new(namespace);
    let identifier = ClassIdentifier::from(identifier);
    (0..count).map(|_| names.allocate(&identifier)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_the_disambiguated_sequence() {
        let names = allocation_sequence("pkg.make.<locals>.Point", 3, "org.crossload.user").unwrap();
        assert_eq!(
            names,
            [
                "org.crossload.user.pkg.make._locals_.Point",
                "org.crossload.user.pkg.make._locals_.Point$$2",
                "org.crossload.user.pkg.make._locals_.Point$$3",
            ]
        );
    }
}
