#[cfg(test)]
mod plan_properties {
    use ipnetwork::Ipv4Network;

    use vpcplan::config::Config;
    use vpcplan::error::PlanError;
    use vpcplan::ip::{overlaps, BlockOrder};
    use vpcplan::orchestrator::plan_network;
    use vpcplan::plan::{verify_append_only, NetworkPlan, SecondaryUsage};
    use vpcplan::zones::{RegionZones, ZoneDirectory};

    fn net(s: &str) -> Ipv4Network {
        s.parse().unwrap()
    }

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// Zone directory shaped like a real discovery cache, including a gapped region
    fn aws_like_directory() -> ZoneDirectory {
        let mut directory = ZoneDirectory::new();
        directory.insert(
            "us-east-1",
            RegionZones::new(
                ["us-east-1a", "us-east-1b", "us-east-1c", "us-east-1d", "us-east-1e", "us-east-1f"],
                ["use1-az6", "use1-az1", "use1-az2", "use1-az4", "use1-az3", "use1-az5"],
            ),
        );
        directory.insert(
            "us-east-2",
            RegionZones::new(["us-east-2a", "us-east-2b", "us-east-2c"], ["use2-az1", "use2-az2", "use2-az3"]),
        );
        directory.insert(
            "us-west-1",
            RegionZones::new(["us-west-1b", "us-west-1c"], ["usw1-az1", "usw1-az3"]),
        );
        directory.insert(
            "us-west-2",
            RegionZones::new(
                ["us-west-2a", "us-west-2b", "us-west-2c", "us-west-2d"],
                ["usw2-az1", "usw2-az2", "usw2-az3", "usw2-az4"],
            ),
        );
        directory
    }

    fn aws_like_config(regions: &[&str]) -> Config {
        Config {
            max_regions: 20,
            provision_order: strings(regions),
            ..Config::default()
        }
    }

    fn all_emitted(plan: &NetworkPlan) -> Vec<Ipv4Network> {
        plan.zone_subnets()
    }

    #[test]
    fn test_worked_example() {
        let config = Config {
            max_regions: 2,
            max_blocks_per_region: 2,
            zone_subnet_prefix: 24,
            subnet_categories: strings(&["public", "internal"]),
            provision_order: strings(&["region-a", "region-b"]),
            ..Config::default()
        };
        let mut directory = ZoneDirectory::new();
        directory.insert(
            "region-a",
            RegionZones::new(["region-a1", "region-a2"], ["region-a-az1", "region-a-az2"]),
        );

        let plan = plan_network(&config, &directory, BlockOrder::Sequential).unwrap();
        let value = serde_json::to_value(&plan).unwrap();
        let region = &value["region-a"];

        assert_eq!(region["subnets"]["public"]["region-a-az1"], "10.2.0.0/24");
        assert_eq!(region["subnets"]["public"]["region-a-az2"], "10.2.1.0/24");
        assert_eq!(region["subnets"]["internal"]["region-a-az1"], "10.2.2.0/24");
        assert_eq!(region["subnets"]["internal"]["region-a-az2"], "10.2.3.0/24");
        assert_eq!(region["vpc"]["primary"], "10.2.0.0/16");
        assert_eq!(region["vpc"]["secondary"], serde_json::json!([]));
        assert_eq!(region["vpc"]["_unused"], serde_json::json!(["10.3.0.0/16"]));
        assert_eq!(region["zoneIds"], serde_json::json!(["region-a-az1", "region-a-az2"]));

        // region-b is not in the directory: omitted, but 10.4/16 and 10.5/16 stay reserved
        assert!(value.get("region-b").is_none());
        assert_eq!(plan.skipped, vec!["region-b"]);
    }

    #[test]
    fn test_determinism() {
        let config = aws_like_config(&["us-east-1", "us-east-2", "us-west-1", "us-west-2"]);
        let directory = aws_like_directory();

        let first = plan_network(&config, &directory, BlockOrder::Sequential).unwrap();
        let second = plan_network(&config, &directory, BlockOrder::Sequential).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.to_json_pretty().unwrap(), second.to_json_pretty().unwrap());
    }

    #[test]
    fn test_global_non_overlap() {
        let config = aws_like_config(&["us-east-1", "us-east-2", "us-west-1", "us-west-2"]);
        let plan = plan_network(&config, &aws_like_directory(), BlockOrder::Sequential).unwrap();

        let emitted = all_emitted(&plan);
        assert!(!emitted.is_empty());
        for (i, a) in emitted.iter().enumerate() {
            for b in &emitted[i + 1..] {
                assert!(!overlaps(a, b), "{} overlaps {}", a, b);
            }
        }

        let blocks = plan.vpc_blocks();
        for (i, a) in blocks.iter().enumerate() {
            for b in &blocks[i + 1..] {
                assert!(!overlaps(a, b), "{} overlaps {}", a, b);
            }
        }
    }

    #[test]
    fn test_append_only_stability() {
        let directory = aws_like_directory();
        let before = plan_network(
            &aws_like_config(&["us-east-1", "us-east-2", "us-west-1"]),
            &directory,
            BlockOrder::Sequential,
        )
        .unwrap();
        let after = plan_network(
            &aws_like_config(&["us-east-1", "us-east-2", "us-west-1", "us-west-2"]),
            &directory,
            BlockOrder::Sequential,
        )
        .unwrap();

        for region in &before.regions {
            assert_eq!(Some(region), after.region(&region.region));
        }

        let previous = serde_json::to_value(&before).unwrap();
        let report = verify_append_only(&previous, &after).unwrap();
        assert_eq!(report.unchanged.len(), 3);
        assert_eq!(report.added, vec!["us-west-2"]);
    }

    #[test]
    fn test_reordering_is_detected() {
        let directory = aws_like_directory();
        let before = plan_network(
            &aws_like_config(&["us-east-1", "us-east-2"]),
            &directory,
            BlockOrder::Sequential,
        )
        .unwrap();
        let after = plan_network(
            &aws_like_config(&["us-east-2", "us-east-1"]),
            &directory,
            BlockOrder::Sequential,
        )
        .unwrap();

        let previous = serde_json::to_value(&before).unwrap();
        let err = verify_append_only(&previous, &after).unwrap_err();
        assert!(matches!(err, PlanError::AllocationDrift { .. }));
    }

    #[test]
    fn test_gap_reservation() {
        let config = aws_like_config(&["us-west-1"]);
        let plan = plan_network(&config, &aws_like_directory(), BlockOrder::Sequential).unwrap();
        let region = plan.region("us-west-1").unwrap();

        // Default /19 zone subnets in 10.2.0.0/16
        let public = region.subnets.category("public").unwrap();
        assert_eq!(public.subnet_for("usw1-az1"), Some(net("10.2.0.0/19")));
        assert_eq!(public.subnet_for("usw1-az3"), Some(net("10.2.64.0/19")));
        assert_eq!(public.subnet_for("usw1-az2"), None);

        let internal = region.subnets.category("internal").unwrap();
        assert_eq!(internal.subnet_for("usw1-az1"), Some(net("10.2.96.0/19")));
        assert_eq!(internal.subnet_for("usw1-az3"), Some(net("10.2.160.0/19")));

        // Subnets held for the missing ordinal are nowhere in the output
        let held = [net("10.2.32.0/19"), net("10.2.128.0/19")];
        assert!(all_emitted(&plan).iter().all(|subnet| !held.contains(subnet)));
        assert_eq!(region.zone_ids, strings(&["usw1-az1", "usw1-az3"]));
    }

    #[test]
    fn test_zone_ids_are_sorted_by_ordinal() {
        let config = aws_like_config(&["us-east-1"]);
        let plan = plan_network(&config, &aws_like_directory(), BlockOrder::Sequential).unwrap();
        let region = plan.region("us-east-1").unwrap();

        assert_eq!(
            region.zone_ids,
            strings(&["use1-az1", "use1-az2", "use1-az3", "use1-az4", "use1-az5", "use1-az6"])
        );
        let public = region.subnets.category("public").unwrap();
        assert_eq!(public.subnet_for("use1-az1"), Some(net("10.2.0.0/19")));
        assert_eq!(public.subnet_for("use1-az6"), Some(net("10.2.160.0/19")));
        // 12 /19s: the primary /16 holds 8, so the first secondary is used
        let internal = region.subnets.category("internal").unwrap();
        assert_eq!(internal.subnet_for("use1-az6"), Some(net("10.3.96.0/19")));
        assert_eq!(region.vpc.usage, SecondaryUsage::Through(0));
        assert_eq!(region.vpc.secondary, vec![net("10.3.0.0/16")]);
        assert_eq!(region.vpc.unused.len(), 3);
    }

    #[test]
    fn test_secondary_trimming() {
        let config = aws_like_config(&["us-east-2"]);
        assert_eq!(config.max_blocks_per_region, 5);

        let plan = plan_network(&config, &aws_like_directory(), BlockOrder::Sequential).unwrap();
        let vpc = &plan.region("us-east-2").unwrap().vpc;

        assert_eq!(vpc.primary, net("10.2.0.0/16"));
        assert!(vpc.secondary.is_empty());
        assert_eq!(
            vpc.unused,
            vec![net("10.3.0.0/16"), net("10.4.0.0/16"), net("10.5.0.0/16"), net("10.6.0.0/16")]
        );
        assert_eq!(vpc.usage, SecondaryUsage::PrimaryOnly);
    }

    #[test]
    fn test_capacity_precondition() {
        let config = Config {
            max_regions: 300,
            max_blocks_per_region: 5,
            account_offset: 0,
            provision_order: strings(&["us-east-1"]),
            ..Config::default()
        };

        let err = plan_network(&config, &aws_like_directory(), BlockOrder::Sequential).unwrap_err();
        assert!(matches!(err, PlanError::CapacityExceeded { demanded: 1502, available: 256 }));
    }

    #[test]
    fn test_account_offsets_do_not_collide() {
        let directory = aws_like_directory();
        let mut config = aws_like_config(&["us-east-1", "us-east-2"]);
        let first = plan_network(&config, &directory, BlockOrder::Sequential).unwrap();
        config.account_offset = 1;
        let second = plan_network(&config, &directory, BlockOrder::Sequential).unwrap();

        assert_eq!(second.region("us-east-1").unwrap().vpc.primary, net("10.102.0.0/16"));
        for a in first.vpc_blocks() {
            for b in second.vpc_blocks() {
                assert!(!overlaps(&a, &b), "{} overlaps {}", a, b);
            }
        }
    }

    #[test]
    fn test_allocation_exhausted() {
        let config = Config {
            max_blocks_per_region: 1,
            zone_subnet_prefix: 18,
            ..aws_like_config(&["us-east-1"])
        };

        let err = plan_network(&config, &aws_like_directory(), BlockOrder::Sequential).unwrap_err();
        assert!(matches!(err, PlanError::AllocationExhausted { needed: 12, available: 4, .. }));
    }

    #[test]
    fn test_unsupported_zone_ordinal() {
        let mut directory = aws_like_directory();
        directory.insert(
            "us-east-2",
            RegionZones::new(["us-east-2a", "us-east-2j"], ["use2-az1", "use2-az10"]),
        );

        let err = plan_network(&aws_like_config(&["us-east-2"]), &directory, BlockOrder::Sequential).unwrap_err();
        assert!(matches!(err, PlanError::UnsupportedZoneOrdinal { .. }));
    }

    #[test]
    fn test_shuffled_mode_is_seeded() {
        let config = aws_like_config(&["us-east-1", "us-east-2", "us-west-1", "us-west-2"]);
        let directory = aws_like_directory();
        let order = BlockOrder::Shuffled { seed: 1234 };

        let first = plan_network(&config, &directory, order).unwrap();
        let second = plan_network(&config, &directory, order).unwrap();
        assert_eq!(first.to_json_pretty().unwrap(), second.to_json_pretty().unwrap());

        // Shuffled blocks may be non-adjacent, but nothing overlaps
        let emitted = all_emitted(&first);
        for (i, a) in emitted.iter().enumerate() {
            for b in &emitted[i + 1..] {
                assert!(!overlaps(a, b), "{} overlaps {}", a, b);
            }
        }
    }
}
