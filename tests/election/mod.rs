mod election_case1;
mod election_case2;
mod election_case3;
